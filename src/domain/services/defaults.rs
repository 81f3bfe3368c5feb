use crate::domain::models::housekeeping::{CLEANING_DEEP, CLEANING_FULL, CLEANING_LINEN_CHANGE, CLEANING_STANDARD};

const STANDARD_CHECKLIST: &[&str] = &[
    "Strip beds and remake with fresh linen",
    "Replace bath and pool towels",
    "Clean and disinfect bathrooms",
    "Clean kitchen surfaces and appliances",
    "Run and empty dishwasher",
    "Vacuum and mop all floors",
    "Empty all bins",
    "Restock toiletries and welcome amenities",
    "Check for guest damage or left items",
];

const DEEP_CHECKLIST: &[&str] = &[
    "Strip beds and remake with fresh linen",
    "Replace bath and pool towels",
    "Descale showers, taps and toilets",
    "Clean inside oven, fridge and microwave",
    "Wipe cupboards inside and out",
    "Wash windows and sliding doors",
    "Dust skirting boards, lamps and ceiling fans",
    "Vacuum mattresses and upholstery",
    "Vacuum and mop all floors",
    "Clean terrace furniture",
    "Empty all bins",
    "Restock toiletries and welcome amenities",
];

const LINEN_CHANGE_CHECKLIST: &[&str] = &[
    "Change bed linen",
    "Replace bath and pool towels",
    "Empty bathroom bins",
    "Tidy bedrooms",
];

const FULL_CHECKLIST: &[&str] = &[
    "Change bed linen",
    "Replace bath and pool towels",
    "Clean and disinfect bathrooms",
    "Clean kitchen surfaces",
    "Wash up and put away dishes",
    "Vacuum and mop all floors",
    "Empty all bins",
    "Restock toiletries",
];

/// Built-in checklist for a cleaning type, used when no template is stored for it.
/// Unknown types get the standard checklist.
pub fn get_default_checklist(cleaning_type: &str) -> Vec<String> {
    let items = match cleaning_type {
        CLEANING_STANDARD => STANDARD_CHECKLIST,
        CLEANING_DEEP => DEEP_CHECKLIST,
        CLEANING_LINEN_CHANGE => LINEN_CHANGE_CHECKLIST,
        CLEANING_FULL => FULL_CHECKLIST,
        _ => STANDARD_CHECKLIST,
    };
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_checklists_exist() {
        let standard = get_default_checklist("Standard");
        assert!(standard.iter().any(|i| i.contains("Strip beds")));

        let deep = get_default_checklist("Deep");
        assert!(deep.iter().any(|i| i.contains("inside oven")));
        assert!(deep.len() > standard.len());

        let linen = get_default_checklist("Linen & Towel Change");
        assert_eq!(linen[0], "Change bed linen");

        let full = get_default_checklist("Full");
        assert!(full.iter().any(|i| i.contains("bathrooms")));

        let unknown = get_default_checklist("Pool Service");
        assert_eq!(unknown, standard);
    }
}
