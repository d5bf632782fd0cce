//! Form state for the registration screen
//!
//! Inputs live in [`FormState`]; everything the screen toggles is derived
//! from them on each read by [`ViewFlags::derive`].

use chrono::NaiveDate;
use radar_core::types::IdentifierRules;
use serde::{Deserialize, Serialize};

/// Label of the "had symptoms" radio button.
pub const LABEL_WITH_SYMPTOMS: &str = "Yes";

/// Label of the "no symptoms" radio button.
pub const LABEL_NO_SYMPTOMS: &str = "No";

/// Which date layout the user picked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymptomSelection {
    /// Nothing picked yet
    #[default]
    Unselected,
    /// Enter the symptom onset date
    WithSymptoms,
    /// Enter the test date
    NoSymptoms,
}

impl SymptomSelection {
    /// Map a radio-button label. Unrecognised labels clear the selection.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case(LABEL_WITH_SYMPTOMS) {
            Self::WithSymptoms
        } else if label.eq_ignore_ascii_case(LABEL_NO_SYMPTOMS) {
            Self::NoSymptoms
        } else {
            Self::Unselected
        }
    }

    /// Whether a layout has been chosen.
    pub fn is_selected(self) -> bool {
        !matches!(self, Self::Unselected)
    }
}

/// User inputs on the registration screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    /// Processing number as typed (unvalidated)
    pub identifier: String,
    /// Symptom layout
    pub selection: SymptomSelection,
    /// Opened from a deep link carrying the processing number
    pub deep_link: bool,
    /// Symptom onset or test date
    pub diagnosis_date: NaiveDate,
}

impl FormState {
    /// Empty form dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            identifier: String::new(),
            selection: SymptomSelection::Unselected,
            deep_link: false,
            diagnosis_date: today,
        }
    }
}

/// Derived visibility and enablement flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFlags {
    /// Register button enabled
    pub is_submit_enabled: bool,
    /// Processing number field locked
    pub is_identifier_read_only: bool,
    /// "How to obtain a processing number" help shown
    pub is_how_to_obtain_visible: bool,
    /// Link to the consent page shown
    pub is_consent_link_visible: bool,
    /// Inquiry phone number shown
    pub is_inquiry_phone_visible: bool,
    /// Symptom onset date picker shown
    pub is_with_symptoms_layout_visible: bool,
    /// Test date picker shown
    pub is_no_symptoms_layout_visible: bool,
}

impl ViewFlags {
    /// Derive flags from `form`.
    ///
    /// Submit is enabled once the identifier has the configured length and a
    /// layout is chosen; the character class is checked on submit, not here.
    pub fn derive(form: &FormState, rules: &IdentifierRules) -> Self {
        Self {
            is_submit_enabled: is_submit_enabled(&form.identifier, form.selection, rules),
            is_identifier_read_only: form.deep_link,
            is_how_to_obtain_visible: !form.deep_link,
            is_consent_link_visible: form.deep_link,
            is_inquiry_phone_visible: form.deep_link,
            is_with_symptoms_layout_visible: form.selection == SymptomSelection::WithSymptoms,
            is_no_symptoms_layout_visible: form.selection == SymptomSelection::NoSymptoms,
        }
    }
}

/// Register button enablement.
pub fn is_submit_enabled(
    identifier: &str,
    selection: SymptomSelection,
    rules: &IdentifierRules,
) -> bool {
    identifier.chars().count() == rules.length && selection.is_selected()
}
