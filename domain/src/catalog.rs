use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Catalog entry for a narrator. The `*_ref` fields are translation keys and asset paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceOption {
    pub key: &'static str,
    pub display_name_ref: &'static str,
    pub portrait_ref: &'static str,
    pub description_ref: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceCategory {
    Male,
    Female,
}

pub const VOICE_CATEGORIES: [VoiceCategory; 2] = [VoiceCategory::Male, VoiceCategory::Female];

const CATEGORY_CARDS: [VoiceOption; 2] = [
    VoiceOption {
        key: "man",
        display_name_ref: "SPEAKER_MALE",
        portrait_ref: "assets/speakers/levitan_2.jpg",
        description_ref: "SPEAKER_MALE_DESC",
    },
    VoiceOption {
        key: "woman",
        display_name_ref: "SPEAKER_FEMALE",
        portrait_ref: "assets/speakers/shatilova.jpg",
        description_ref: "SPEAKER_FEMALE_DESC",
    },
];

const MALE_VOICES: [VoiceOption; 2] = [
    VoiceOption {
        key: "levitan",
        display_name_ref: "LEVITAN_NAME",
        portrait_ref: "assets/speakers/levitan.jpg",
        description_ref: "LEVITAN_DESC",
    },
    VoiceOption {
        key: "hmara",
        display_name_ref: "KHMARA_NAME",
        portrait_ref: "assets/speakers/khmara.jpg",
        description_ref: "KHMARA_DESC",
    },
];

const FEMALE_VOICES: [VoiceOption; 2] = [
    VoiceOption {
        key: "bergholz",
        display_name_ref: "BERGGOLTS_NAME",
        portrait_ref: "assets/speakers/berggolts.jpg",
        description_ref: "BERGGOLTS_DESC",
    },
    VoiceOption {
        key: "vysotskaya",
        display_name_ref: "VYSOTSKAYA_NAME",
        portrait_ref: "assets/speakers/vysotskaya.webp",
        description_ref: "VYSOTSKAYA_DESC",
    },
];

impl VoiceCategory {
    pub fn voices(self) -> &'static [VoiceOption] {
        match self {
            VoiceCategory::Male => &MALE_VOICES,
            VoiceCategory::Female => &FEMALE_VOICES,
        }
    }

    /// The card shown on the category step.
    pub fn card(self) -> &'static VoiceOption {
        match self {
            VoiceCategory::Male => &CATEGORY_CARDS[0],
            VoiceCategory::Female => &CATEGORY_CARDS[1],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VoiceCategory::Male => "male",
            VoiceCategory::Female => "female",
        }
    }
}

impl fmt::Display for VoiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceCategory {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "man" => Ok(VoiceCategory::Male),
            "female" | "woman" => Ok(VoiceCategory::Female),
            other => Err(DomainError::validation(format!(
                "unknown voice category `{other}`"
            ))),
        }
    }
}

pub fn find_voice(key: &str) -> Option<(VoiceCategory, &'static VoiceOption)> {
    VOICE_CATEGORIES.iter().find_map(|category| {
        category
            .voices()
            .iter()
            .find(|voice| voice.key == key)
            .map(|voice| (*category, voice))
    })
}
