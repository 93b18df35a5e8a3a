use serde::Deserialize;

/// Partial profile update; email and password have their own flows.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub marital_status: Option<String>,
    pub dependents: Option<i32>,
    pub employment_type: Option<String>,
    pub annual_income: Option<f64>,
    pub risk_profile: Option<String>,
}

/// Body for PATCH /user/onboarding-step, also used by wizard skips.
#[derive(Debug, Deserialize)]
pub struct OnboardingStepRequest {
    pub category: Option<String>,
}
