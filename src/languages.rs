// ABOUTME: Supported conversation languages with display names and speech locales
// ABOUTME: Resolves codes, English names and aliases, defaulting unknown values to English
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ShantiSaathi Contributors

//! Language registry
//!
//! The table is fixed at compile time. Lookups never fail: anything the
//! registry does not recognise resolves to English.

use serde::Serialize;

/// One supported language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    /// Short code (`hi`)
    pub code: &'static str,
    /// English name (`Hindi`)
    pub name: &'static str,
    /// Native script followed by the English name (`हिंदी (Hindi)`)
    pub full_name: &'static str,
    /// Speech synthesis locale (`hi-IN`)
    #[serde(skip)]
    pub voice_locale: &'static str,
    /// Greeting shown and spoken when a session starts in this language
    #[serde(skip)]
    pub welcome: &'static str,
}

/// Code used when a requested language is unknown
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// All supported languages, in catalogue order
pub static LANGUAGES: &[Language] = &[
    Language {
        code: "en",
        name: "English",
        full_name: "English",
        voice_locale: "en-US",
        welcome: "Hello! 🙏 I am ShantiSaathi - your AI companion for emotional wellness. 😊\n\nYou can speak to me in any Indian language. 💬\n\nHow can I help you today? ✨",
    },
    Language {
        code: "hi",
        name: "Hindi",
        full_name: "हिंदी (Hindi)",
        voice_locale: "hi-IN",
        welcome: "नमस्ते! 🙏 मैं शान्ति साथी हूँ - आपकी भावनात्मक कल्याण की AI साथी। 😊\n\nआप किसी भी भारतीय भाषा में बात कर सकते हैं। 💬\n\nआज मैं आपकी कैसे सहायता कर सकता हूँ? ✨",
    },
    Language {
        code: "ta",
        name: "Tamil",
        full_name: "தமிழ் (Tamil)",
        voice_locale: "ta-IN",
        welcome: "வணக்கம்! 🙏 நான் சாந்தி சாத்தி - உங்கள் உணர்ச்சி நல்வாழ்விற்கான AI துணை. 😊\n\nநீங்கள் எந்த இந்திய மொழியிலும் பேசலாம். 💬\n\nஇன்று நான் உங்களுக்கு எப்படி உதவலாம்? ✨",
    },
    Language {
        code: "bn",
        name: "Bengali",
        full_name: "বাংলা (Bengali)",
        voice_locale: "bn-IN",
        welcome: "নমস্কার! 🙏 আমি শান্তি সাথী - আপনার আবেগ সুস্থতার AI সঙ্গী। 😊\n\nআপনি যেকোনো ভারতীয় ভাষায় কথা বলতে পারেন। 💬\n\nআজ আমি কীভাবে আপনাকে সাহায্য করতে পারি? ✨",
    },
    Language {
        code: "te",
        name: "Telugu",
        full_name: "తెలుగు (Telugu)",
        voice_locale: "te-IN",
        welcome: "నమస్కారం! 🙏 నేను శాంతి సాథీ - మీ భావోద్వేగ శ్రేయస్సు కోసం AI సహచరుడు। 😊\n\nమీరు ఏ భారతీయ భాషలోనైనా మాట్లాడవచ్చు। 💬\n\nఈరోజు నేను మీకు ఎలా సహాయం చేయగలను? ✨",
    },
    Language {
        code: "mr",
        name: "Marathi",
        full_name: "मराठी (Marathi)",
        voice_locale: "mr-IN",
        welcome: "नमस्कार! 🙏 मी शांती साथी आहे - तुमच्या भावनिक कल्याणाचा AI साथीदार। 😊\n\nतुम्ही कोणत्याही भारतीय भाषेत बोलू शकता। 💬\n\nआज मी तुम्हाला कशी मदत करू शकतो? ✨",
    },
    Language {
        code: "gu",
        name: "Gujarati",
        full_name: "ગુજરાતી (Gujarati)",
        voice_locale: "gu-IN",
        welcome: "નમસ્તે! 🙏 હું શાંતિ સાથી છું - તમારા ભાવનાત્મક સુખાકારી માટે AI સાથી। 😊\n\nતમે કોઈપણ ભારતીય ભાષામાં બોલી શકો છો। 💬\n\nઆજે હું તમને કેવી રીતે મદદ કરી શકું? ✨",
    },
    Language {
        code: "kn",
        name: "Kannada",
        full_name: "ಕನ್ನಡ (Kannada)",
        voice_locale: "kn-IN",
        welcome: "ನಮಸ್ಕಾರ! 🙏 ನಾನು ಶಾಂತಿ ಸಾಥಿ - ನಿಮ್ಮ ಭಾವನಾತ್ಮಕ ಯೋಗಕ್ಷೇಮಕ್ಕಾಗಿ AI ಸಹಚರ। 😊\n\nನೀವು ಯಾವುದೇ ಭಾರತೀಯ ಭಾಷೆಯಲ್ಲಿ ಮಾತನಾಡಬಹುದು। 💬\n\nಇಂದು ನಾನು ನಿಮಗೆ ಹೇಗೆ ಸಹಾಯ ಮಾಡಬಹುದು? ✨",
    },
    Language {
        code: "ml",
        name: "Malayalam",
        full_name: "മലയാളം (Malayalam)",
        voice_locale: "ml-IN",
        welcome: "നമസ്കാരം! 🙏 ഞാൻ ശാന്തി സാഥി - നിങ്ങളുടെ വൈകാരിക ക്ഷേമത്തിനുള്ള AI സഹചാരി। 😊\n\nനിങ്ങൾക്ക് ഏത് ഇന്ത്യൻ ഭാഷയിലും സംസാരിക്കാം। 💬\n\nഇന്ന് ഞാൻ നിങ്ങളെ എങ്ങനെ സഹായിക്കാം? ✨",
    },
    Language {
        code: "pa",
        name: "Punjabi",
        full_name: "ਪੰਜਾਬੀ (Punjabi)",
        voice_locale: "pa-IN",
        welcome: "ਸਤ ਸ੍ਰੀ ਅਕਾਲ! 🙏 ਮੈਂ ਸ਼ਾਂਤੀ ਸਾਥੀ ਹਾਂ - ਤੁਹਾਡੀ ਭਾਵਨਾਤਮਕ ਤੰਦਰੁਸਤੀ ਲਈ AI ਸਾਥੀ। 😊\n\nਤੁਸੀਂ ਕਿਸੇ ਵੀ ਭਾਰਤੀ ਭਾਸ਼ਾ ਵਿੱਚ ਗੱਲ ਕਰ ਸਕਦੇ ਹੋ। 💬\n\nਅੱਜ ਮੈਂ ਤੁਹਾਡੀ ਕਿਵੇਂ ਮਦਦ ਕਰ ਸਕਦਾ ਹਾਂ? ✨",
    },
    Language {
        code: "ur",
        name: "Urdu",
        full_name: "اردو (Urdu)",
        voice_locale: "ur-IN",
        welcome: "آداب! 🙏 میں شانتی ساتھی ہوں - آپ کی جذباتی صحت کے لیے AI ساتھی۔ 😊\n\nآپ کسی بھی ہندوستانی زبان میں بات کر سکتے ہیں। 💬\n\nآج میں آپ کی کیسے مدد کر سکتا ہوں؟ ✨",
    },
];

/// Informal names the web client has used for a language
const ALIASES: &[(&str, &str)] = &[("hinglish", "hi"), ("bangla", "bn")];

/// The default language (English)
#[must_use]
pub fn default_language() -> &'static Language {
    &LANGUAGES[0]
}

/// Find a language by code, English name or alias
#[must_use]
pub fn find(value: &str) -> Option<&'static Language> {
    let wanted = value.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    let code = ALIASES
        .iter()
        .find(|(alias, _)| *alias == wanted)
        .map_or(wanted.as_str(), |&(_, code)| code);

    LANGUAGES
        .iter()
        .find(|lang| lang.code == code || lang.name.eq_ignore_ascii_case(code))
}

/// Resolve an optional requested language, defaulting to English
#[must_use]
pub fn resolve(value: Option<&str>) -> &'static Language {
    value.and_then(find).unwrap_or_else(default_language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_codes_names_and_aliases() {
        assert_eq!(resolve(Some("hi")).full_name, "हिंदी (Hindi)");
        assert_eq!(resolve(Some("hindi")).code, "hi");
        assert_eq!(resolve(Some("  Tamil ")).code, "ta");
        assert_eq!(resolve(Some("hinglish")).code, "hi");
        assert_eq!(resolve(Some("UR")).voice_locale, "ur-IN");
    }

    #[test]
    fn test_unknown_languages_default_to_english() {
        assert_eq!(resolve(Some("klingon")).code, DEFAULT_LANGUAGE_CODE);
        assert_eq!(resolve(Some("")).code, DEFAULT_LANGUAGE_CODE);
        assert_eq!(resolve(None).full_name, "English");
    }

    #[test]
    fn test_catalogue_has_unique_codes() {
        assert_eq!(LANGUAGES.len(), 11);
        for (i, lang) in LANGUAGES.iter().enumerate() {
            assert!(LANGUAGES[i + 1..].iter().all(|other| other.code != lang.code));
        }
    }

    #[test]
    fn test_serializes_without_voice_locale() {
        let value = serde_json::to_value(resolve(Some("bn"))).unwrap();
        assert_eq!(value["code"], "bn");
        assert_eq!(value["fullName"], "বাংলা (Bengali)");
        assert!(value.get("voiceLocale").is_none());
    }

    #[test]
    fn test_every_language_has_a_native_greeting() {
        for lang in LANGUAGES {
            assert!(!lang.welcome.trim().is_empty(), "{} has no greeting", lang.code);
        }
        assert!(resolve(Some("hindi")).welcome.starts_with("नमस्ते!"));
        assert!(resolve(Some("klingon")).welcome.starts_with("Hello!"));
        assert_ne!(resolve(Some("ta")).welcome, resolve(Some("en")).welcome);
    }

    #[test]
    fn test_greeting_is_not_part_of_catalogue_output() {
        let json = serde_json::to_value(default_language()).unwrap();
        assert!(json.get("welcome").is_none());
        assert_eq!(json["fullName"], "English");
    }
}
