use lettervideo_domain::{GenerationRequest, LetterLimits, VoiceCategory, VoiceOption};
use serde::Serialize;

use crate::{ApplicationError, PageEvent, UiPageState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationDraft {
    pub letter_text: String,
    pub voice_key: Option<String>,
    pub include_subtitles: bool,
    pub include_music: bool,
}

impl Default for GenerationDraft {
    fn default() -> Self {
        Self {
            letter_text: String::new(),
            voice_key: None,
            include_subtitles: true,
            include_music: true,
        }
    }
}

/// Synchronous part of the create flow: letter, category, voice and options.
#[derive(Debug, Clone)]
pub struct CreateWizard {
    page: UiPageState,
    draft: GenerationDraft,
    category: Option<VoiceCategory>,
    limits: LetterLimits,
}

impl CreateWizard {
    pub fn new(limits: LetterLimits) -> Self {
        Self {
            page: UiPageState::LetterInput,
            draft: GenerationDraft::default(),
            category: None,
            limits,
        }
    }

    pub fn page(&self) -> UiPageState {
        self.page
    }

    pub fn draft(&self) -> &GenerationDraft {
        &self.draft
    }

    pub fn category(&self) -> Option<VoiceCategory> {
        self.category
    }

    pub fn limits(&self) -> &LetterLimits {
        &self.limits
    }

    /// Voices offered on the pick step for the chosen category.
    pub fn available_voices(&self) -> &'static [VoiceOption] {
        self.category.map(VoiceCategory::voices).unwrap_or(&[])
    }

    pub fn set_letter(&mut self, text: impl Into<String>) -> Result<(), ApplicationError> {
        self.ensure_editable()?;
        self.draft.letter_text = text.into();
        Ok(())
    }

    /// Refused, with the page left unchanged, when the letter is out of bounds.
    pub fn advance_to_voice_category(&mut self) -> Result<(), ApplicationError> {
        self.limits.check(&self.draft.letter_text)?;
        self.apply(PageEvent::LetterAccepted)
    }

    pub fn choose_category(
        &mut self,
        category: VoiceCategory,
    ) -> Result<&'static [VoiceOption], ApplicationError> {
        self.apply(PageEvent::CategoryChosen)?;
        self.category = Some(category);
        Ok(category.voices())
    }

    pub fn choose_voice(&mut self, key: &str) -> Result<(), ApplicationError> {
        if key.trim().is_empty() {
            return Err(ApplicationError::Validation("no voice selected".to_string()));
        }
        self.apply(PageEvent::VoiceChosen)?;
        self.draft.voice_key = Some(key.to_string());
        Ok(())
    }

    pub fn set_options(
        &mut self,
        include_subtitles: bool,
        include_music: bool,
    ) -> Result<(), ApplicationError> {
        self.ensure_editable()?;
        self.draft.include_subtitles = include_subtitles;
        self.draft.include_music = include_music;
        Ok(())
    }

    pub fn go_back(&mut self, target: UiPageState) -> Result<(), ApplicationError> {
        self.apply(PageEvent::Back(target))
    }

    pub fn build_request(&self) -> Result<GenerationRequest, ApplicationError> {
        let voice_key = self
            .draft
            .voice_key
            .clone()
            .ok_or_else(|| ApplicationError::Validation("no voice selected".to_string()))?;
        let request = GenerationRequest {
            letter_text: self.draft.letter_text.clone(),
            voice_key,
            include_subtitles: self.draft.include_subtitles,
            include_music: self.draft.include_music,
        };
        request.validate(&self.limits)?;
        Ok(request)
    }

    /// Starts a fresh cycle from a terminal page with an empty draft.
    pub fn restart(&mut self) -> Result<(), ApplicationError> {
        self.apply(PageEvent::Restart)?;
        self.draft = GenerationDraft::default();
        self.category = None;
        Ok(())
    }

    pub(crate) fn apply(&mut self, event: PageEvent) -> Result<(), ApplicationError> {
        self.page = self.page.transition(event)?;
        Ok(())
    }

    /// Adopts the letter of a request submitted directly, bypassing the wizard steps.
    pub(crate) fn adopt_request(&mut self, request: &GenerationRequest) {
        self.draft = GenerationDraft {
            letter_text: request.letter_text.clone(),
            voice_key: Some(request.voice_key.clone()),
            include_subtitles: request.include_subtitles,
            include_music: request.include_music,
        };
    }

    fn ensure_editable(&self) -> Result<(), ApplicationError> {
        if self.page.is_editable() {
            Ok(())
        } else {
            Err(ApplicationError::NotEditable(self.page))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard_with_letter(letter: &str) -> CreateWizard {
        let mut wizard = CreateWizard::new(LetterLimits::new(100, 2_000));
        wizard.set_letter(letter).expect("letter page is editable");
        wizard
    }

    #[test]
    fn short_or_long_letters_do_not_advance() {
        for letter in ["x".repeat(99), "x".repeat(2_001), format!("  {}  ", "x".repeat(98))] {
            let mut wizard = wizard_with_letter(&letter);
            let err = wizard.advance_to_voice_category().unwrap_err();
            assert!(err.is_validation());
            assert_eq!(wizard.page(), UiPageState::LetterInput);
        }
    }

    #[test]
    fn choosing_a_category_swaps_the_catalog() {
        let mut wizard = wizard_with_letter(&"x".repeat(150));
        wizard.advance_to_voice_category().expect("letter accepted");
        assert!(wizard.available_voices().is_empty());

        let voices = wizard.choose_category(VoiceCategory::Female).expect("category");
        assert_eq!(voices[0].key, "bergholz");
        assert_eq!(wizard.page(), UiPageState::VoicePick);

        wizard.go_back(UiPageState::VoiceCategory).expect("back");
        wizard.choose_category(VoiceCategory::Male).expect("category");
        assert_eq!(wizard.available_voices()[0].key, "levitan");
    }

    #[test]
    fn choosing_a_voice_stores_the_key_and_moves_to_options() {
        let mut wizard = wizard_with_letter(&"x".repeat(150));
        wizard.advance_to_voice_category().unwrap();
        wizard.choose_category(VoiceCategory::Male).unwrap();

        assert!(wizard.choose_voice("").is_err());
        assert_eq!(wizard.page(), UiPageState::VoicePick);

        wizard.choose_voice("hmara").unwrap();
        assert_eq!(wizard.page(), UiPageState::Options);
        wizard.set_options(false, true).unwrap();

        let request = wizard.build_request().expect("request is complete");
        assert_eq!(request.voice_key, "hmara");
        assert!(!request.include_subtitles);
        assert!(request.include_music);
    }

    #[test]
    fn back_keeps_the_draft() {
        let mut wizard = wizard_with_letter(&"y".repeat(120));
        wizard.advance_to_voice_category().unwrap();
        wizard.choose_category(VoiceCategory::Female).unwrap();
        wizard.choose_voice("vysotskaya").unwrap();
        wizard.go_back(UiPageState::LetterInput).unwrap();

        assert_eq!(wizard.page(), UiPageState::LetterInput);
        assert_eq!(wizard.draft().voice_key.as_deref(), Some("vysotskaya"));
        assert_eq!(wizard.draft().letter_text.len(), 120);
    }

    #[test]
    fn restart_is_only_possible_from_a_terminal_page() {
        let mut wizard = wizard_with_letter(&"x".repeat(150));
        assert!(wizard.restart().is_err());

        wizard.apply(PageEvent::JobFailed).unwrap();
        assert!(matches!(
            wizard.set_letter("new"),
            Err(ApplicationError::NotEditable(UiPageState::Error))
        ));
        wizard.restart().unwrap();
        assert_eq!(wizard.page(), UiPageState::LetterInput);
        assert!(wizard.draft().letter_text.is_empty());
    }
}
