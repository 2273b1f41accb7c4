use std::fmt;
use std::ops::RangeInclusive;

pub const AD_SPEND_RANGE: RangeInclusive<u32> = 1_000..=50_000;
pub const PLATFORM_RANGE: RangeInclusive<u32> = 1..=10;
pub const CAMPAIGN_RANGE: RangeInclusive<u32> = 1..=50;
pub const TEAM_RANGE: RangeInclusive<u32> = 1..=20;

const SAVINGS_RATE: f64 = 0.25;
const MIN_ROI_PERCENT: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Starter,
    Professional,
    Enterprise,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Starter, Tier::Professional, Tier::Enterprise];

    pub fn name(self) -> &'static str {
        match self {
            Self::Starter => "Starter",
            Self::Professional => "Professional",
            Self::Enterprise => "Enterprise",
        }
    }

    /// Monthly price in dollars.
    pub fn monthly_price(self) -> u32 {
        match self {
            Self::Starter => 29,
            Self::Professional => 79,
            Self::Enterprise => 199,
        }
    }

    pub fn features(self) -> &'static [&'static str] {
        match self {
            Self::Starter => &[
                "Up to 5 campaigns",
                "2 platforms",
                "Basic analytics",
                "Email support",
            ],
            Self::Professional => &[
                "Unlimited campaigns",
                "All platforms",
                "Advanced analytics",
                "Priority support",
            ],
            Self::Enterprise => &[
                "Custom solutions",
                "Dedicated manager",
                "API access",
                "24/7 support",
            ],
        }
    }

    /// The tier carrying the "most popular" badge, independent of inputs.
    pub fn is_featured(self) -> bool {
        matches!(self, Self::Professional)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculatorInputs {
    pub monthly_ad_spend: u32,
    pub platforms: u32,
    pub campaigns: u32,
    pub team_size: u32,
}

impl Default for CalculatorInputs {
    fn default() -> Self {
        Self {
            monthly_ad_spend: 5_000,
            platforms: 3,
            campaigns: 10,
            team_size: 2,
        }
    }
}

impl CalculatorInputs {
    /// Pulls every input into its slider range.
    pub fn clamped(self) -> Self {
        Self {
            monthly_ad_spend: clamp(self.monthly_ad_spend, &AD_SPEND_RANGE),
            platforms: clamp(self.platforms, &PLATFORM_RANGE),
            campaigns: clamp(self.campaigns, &CAMPAIGN_RANGE),
            team_size: clamp(self.team_size, &TEAM_RANGE),
        }
    }

    pub fn recommended_tier(&self) -> Tier {
        if self.campaigns > 20
            || self.platforms > 5
            || self.monthly_ad_spend > 10_000
            || self.team_size > 5
        {
            Tier::Enterprise
        } else if self.campaigns > 5 || self.platforms > 2 || self.monthly_ad_spend > 2_000 {
            Tier::Professional
        } else {
            Tier::Starter
        }
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub inputs: CalculatorInputs,
    pub tier: Tier,
    pub annual_savings: f64,
    pub roi_percent: f64,
}

pub fn estimate(inputs: CalculatorInputs) -> Estimate {
    let inputs = inputs.clamped();
    let tier = inputs.recommended_tier();
    let annual_savings = f64::from(inputs.monthly_ad_spend) * SAVINGS_RATE * 12.0;
    let annual_cost = f64::from(tier.monthly_price()) * 12.0;
    let roi_percent = ((annual_savings - annual_cost) / annual_cost * 100.0).max(MIN_ROI_PERCENT);
    Estimate {
        inputs,
        tier,
        annual_savings,
        roi_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::{CalculatorInputs, Tier, estimate};

    #[test]
    fn default_inputs_recommend_professional() {
        let result = estimate(CalculatorInputs::default());
        assert_eq!(result.tier, Tier::Professional);
        assert_eq!(result.annual_savings, 15_000.0);
        assert!((result.roi_percent - 1482.28).abs() < 0.01);
    }

    #[test]
    fn smallest_inputs_recommend_starter() {
        let result = estimate(CalculatorInputs {
            monthly_ad_spend: 0,
            platforms: 0,
            campaigns: 0,
            team_size: 0,
        });
        assert_eq!(result.inputs.monthly_ad_spend, 1_000);
        assert_eq!(result.inputs.platforms, 1);
        assert_eq!(result.tier, Tier::Starter);
        assert_eq!(result.annual_savings, 3_000.0);
    }

    #[test]
    fn large_team_forces_enterprise_and_roi_floor() {
        let result = estimate(CalculatorInputs {
            monthly_ad_spend: 1_000,
            platforms: 1,
            campaigns: 1,
            team_size: 6,
        });
        assert_eq!(result.tier, Tier::Enterprise);
        assert_eq!(result.roi_percent, 150.0);
    }

    #[test]
    fn oversized_inputs_are_clamped() {
        let inputs = CalculatorInputs {
            monthly_ad_spend: 1_000_000,
            platforms: 99,
            campaigns: 99,
            team_size: 99,
        }
        .clamped();
        assert_eq!(inputs.monthly_ad_spend, 50_000);
        assert_eq!(inputs.platforms, 10);
        assert_eq!(inputs.campaigns, 50);
        assert_eq!(inputs.team_size, 20);
    }

    #[test]
    fn only_professional_is_featured() {
        let featured: Vec<_> = Tier::ALL.into_iter().filter(|t| t.is_featured()).collect();
        assert_eq!(featured, vec![Tier::Professional]);
    }
}
