//! Cognitive distortion catalog
//!
//! Fixed list of common CBT thinking patterns with short descriptions.

/// Returned for names that are not in the catalog
pub const NO_DESCRIPTION: &str = "No description available.";

const CBT_DISTORTIONS: &[(&str, &str)] = &[
    ("All-or-Nothing Thinking", "Viewing situations in black-and-white terms, with no middle ground."),
    ("Overgeneralization", "Seeing a single negative event as a never-ending pattern of defeat."),
    ("Mental Filter", "Dwelling on a single negative detail and ignoring the positive."),
    ("Disqualifying the Positive", "Rejecting positive experiences by insisting they 'don't count.'"),
    ("Jumping to Conclusions", "Assuming the worst without supporting evidence."),
    ("Catastrophizing", "Expecting the worst possible outcome."),
    ("Emotional Reasoning", "Assuming that negative emotions reflect reality."),
    ("Should Statements", "Using 'should' or 'must' statements that create guilt or frustration."),
    ("Labeling", "Identifying yourself or others with negative labels."),
    ("Personalization", "Taking responsibility for things outside your control."),
    ("Blaming", "Holding others fully responsible for your emotions or outcomes."),
    ("Control Fallacies", "Believing you are either helpless or responsible for everyone."),
    ("Fallacy of Fairness", "Believing everything must be fair by your standards."),
    ("Heaven's Reward Fallacy", "Expecting that sacrifice will be rewarded, feeling angry when it isn't."),
];

/// Every `(name, description)` pair in catalog order
pub fn all_distortions() -> &'static [(&'static str, &'static str)] {
    CBT_DISTORTIONS
}

pub fn distortion_names() -> Vec<&'static str> {
    CBT_DISTORTIONS.iter().map(|(name, _)| *name).collect()
}

/// Description for `name`, or [`NO_DESCRIPTION`]
pub fn distortion_description(name: &str) -> &'static str {
    CBT_DISTORTIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, description)| *description)
        .unwrap_or(NO_DESCRIPTION)
}

pub fn is_known_distortion(name: &str) -> bool {
    CBT_DISTORTIONS.iter().any(|(n, _)| *n == name)
}
