//! Suggested donation presets.

use serde::Serialize;

/// What a preset donation pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationType {
    /// Laboratory equipment and instruments.
    Equipment,
    /// Student researcher stipends.
    Stipend,
    /// Laboratory operations.
    LabFunding,
    /// Unrestricted support.
    General,
}

/// A preset shown on the donation page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DonationItem {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Suggested amount in whole dollars.
    pub amount: u32,
    /// Purpose.
    #[serde(rename = "type")]
    pub kind: DonationType,
}

/// The fixed presets, in display order.
pub const DONATION_ITEMS: [DonationItem; 4] = [
    DonationItem {
        id: "equipment",
        name: "Research Equipment",
        description: "Fund laboratory equipment and scientific instruments",
        amount: 5000,
        kind: DonationType::Equipment,
    },
    DonationItem {
        id: "stipend",
        name: "Student Stipend",
        description: "Support student researchers with monthly stipends",
        amount: 2500,
        kind: DonationType::Stipend,
    },
    DonationItem {
        id: "lab_funding",
        name: "Laboratory Funding",
        description: "General laboratory operations and maintenance",
        amount: 10000,
        kind: DonationType::LabFunding,
    },
    DonationItem {
        id: "general",
        name: "General Support",
        description: "Unrestricted funding for research initiatives",
        amount: 1000,
        kind: DonationType::General,
    },
];

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::DONATION_ITEMS;
    use crate::checkout::validate_amount;

    #[rstest]
    fn presets_serialise_with_type_key() {
        let value = serde_json::to_value(DONATION_ITEMS.get(2)).expect("preset should serialise");

        assert_eq!(
            value,
            json!({
                "id": "lab_funding",
                "name": "Laboratory Funding",
                "description": "General laboratory operations and maintenance",
                "amount": 10000,
                "type": "lab_funding"
            })
        );
    }

    #[rstest]
    fn every_preset_is_a_valid_checkout_amount() {
        for item in DONATION_ITEMS {
            assert!(
                validate_amount(Some(f64::from(item.amount))).is_ok(),
                "{} should be accepted",
                item.id
            );
        }
    }
}
