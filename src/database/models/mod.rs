pub mod onboarding;

pub use onboarding::OnboardingForm;
