use crate::config::{FlowDefinition, FlowSettings};
use crate::core::field::FieldSpec;
use crate::input::validators;
use crate::runtime::effect::NotificationTemplate;
use crate::state::step::StepDefinition;
use crate::task::DEFAULT_TIMEOUT;

pub const COMPANY_SIZES: [&str; 5] = ["1-10", "11-50", "51-200", "201-1000", "1000+"];
pub const INDUSTRIES: [&str; 6] = [
    "technology",
    "ecommerce",
    "healthcare",
    "finance",
    "education",
    "other",
];
pub const ROLES: [&str; 6] = [
    "ceo",
    "marketing-director",
    "marketing-manager",
    "digital-marketer",
    "agency-owner",
    "other",
];
pub const AD_SPEND_RANGES: [&str; 5] = [
    "0-1000",
    "1000-5000",
    "5000-10000",
    "10000-25000",
    "25000+",
];
pub const PLATFORMS: [&str; 4] = ["google", "facebook", "instagram", "linkedin"];
pub const GOALS: [&str; 4] = [
    "increase-sales",
    "brand-awareness",
    "lead-generation",
    "reduce-costs",
];

pub const NAMES: [&str; 2] = ["signup", "login"];

pub fn by_name(name: &str) -> Option<FlowDefinition> {
    match name {
        "signup" => Some(signup()),
        "login" => Some(login()),
        _ => None,
    }
}

/// Four-step account creation: personal, company, preferences, terms.
pub fn signup() -> FlowDefinition {
    let personal = StepDefinition::builder("personal", "Personal Info")
        .description("Tell us about yourself")
        .field(FieldSpec::text("firstName", "First Name"))
        .field(FieldSpec::text("lastName", "Last Name"))
        .field(FieldSpec::text("email", "Email Address"))
        .field(FieldSpec::text("password", "Password"))
        .field(FieldSpec::text("confirmPassword", "Confirm Password"))
        .require("firstName", "First name is required")
        .require("lastName", "Last name is required")
        .rule(
            "email",
            validators::email(),
            "Please enter a valid email address",
        )
        .rule(
            "password",
            validators::min_length(8),
            "Password must be at least 8 characters",
        )
        .rule(
            "confirmPassword",
            validators::matches_field("password"),
            "Passwords do not match",
        )
        .build();

    let company = StepDefinition::builder("company", "Company Details")
        .description("Your business information")
        .field(FieldSpec::text("companyName", "Company Name"))
        .field(FieldSpec::single_select(
            "companySize",
            "Company Size",
            COMPANY_SIZES,
        ))
        .field(FieldSpec::single_select("industry", "Industry", INDUSTRIES))
        .field(FieldSpec::single_select("role", "Your Role", ROLES))
        .require("companyName", "Company name is required")
        .rule(
            "companySize",
            validators::one_of(COMPANY_SIZES),
            "Please select your company size",
        )
        .rule(
            "industry",
            validators::one_of(INDUSTRIES),
            "Please select your industry",
        )
        .rule("role", validators::one_of(ROLES), "Please select your role")
        .build();

    let preferences = StepDefinition::builder("preferences", "Preferences")
        .description("Customize your experience")
        .field(FieldSpec::single_select(
            "monthlyAdSpend",
            "Monthly Ad Spend",
            AD_SPEND_RANGES,
        ))
        .field(FieldSpec::multi_select(
            "platforms",
            "Advertising Platforms",
            PLATFORMS,
        ))
        .field(FieldSpec::multi_select("goals", "Primary Goals", GOALS).optional())
        .rule(
            "monthlyAdSpend",
            validators::one_of(AD_SPEND_RANGES),
            "Please select your monthly ad spend",
        )
        .rule(
            "platforms",
            validators::non_empty_selection(),
            "Select at least one advertising platform",
        )
        .build();

    let complete = StepDefinition::builder("complete", "Complete")
        .description("You're all set!")
        .field(FieldSpec::boolean(
            "acceptTerms",
            "I agree to the Terms of Service and Privacy Policy",
        ))
        .field(
            FieldSpec::boolean(
                "acceptMarketing",
                "I'd like to receive marketing emails about AdMyBrand updates and tips",
            )
            .optional(),
        )
        .rule(
            "acceptTerms",
            validators::accepted(),
            "You must accept the Terms of Service and Privacy Policy",
        )
        .build();

    FlowDefinition {
        id: "signup".to_string(),
        steps: vec![personal, company, preferences, complete],
        settings: FlowSettings {
            redirect_to: "/login".to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            success: NotificationTemplate::new(
                "Account created successfully!",
                "Welcome to AdMyBrand. Check your email to verify your account.",
                5_000,
            ),
            failure: NotificationTemplate::new(
                "Signup failed",
                "Something went wrong. Please try again.",
                5_000,
            ),
            social_label: "Signup".to_string(),
        },
    }
}

/// Single-step sign in. The only step is also the terminal one.
pub fn login() -> FlowDefinition {
    let credentials = StepDefinition::builder("credentials", "Sign in")
        .description("Welcome back")
        .field(FieldSpec::text("email", "Email Address"))
        .field(FieldSpec::text("password", "Password"))
        .field(FieldSpec::boolean("rememberMe", "Remember me").optional())
        .rule(
            "email",
            validators::email(),
            "Please enter a valid email address",
        )
        .require("password", "Password is required")
        .build();

    FlowDefinition {
        id: "login".to_string(),
        steps: vec![credentials],
        settings: FlowSettings {
            redirect_to: "/".to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            success: NotificationTemplate::new(
                "Welcome back!",
                "You have been successfully logged in.",
                4_000,
            ),
            failure: NotificationTemplate::new(
                "Login failed",
                "Please check your credentials and try again.",
                5_000,
            ),
            social_label: "Login".to_string(),
        },
    }
}
