use mindful_core::types::MedicalProfile;

/// Holds the single medical profile of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileStore {
    profile: MedicalProfile,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current profile; all fields are empty until the first `set`.
    pub fn get(&self) -> &MedicalProfile {
        &self.profile
    }

    /// Replace the whole profile. Fields left empty in `profile` are cleared.
    pub fn set(&mut self, profile: MedicalProfile) {
        self.profile = profile;
        tracing::debug!("Medical profile replaced");
    }
}
