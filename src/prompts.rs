//! Suggested starter questions offered when a conversation is empty.

pub const QUICK_PROMPTS: [&str; 6] = [
    "Summarize the latest guidance for hypertension management.",
    "What are common side effects of metformin?",
    "Explain the differences between Type 1 and Type 2 diabetes.",
    "How should vitamin D deficiency be evaluated?",
    "List warning signs that require urgent care for chest pain.",
    "Outline initial management for acute asthma exacerbation.",
];

/// Looks up a prompt by its 1-based position as shown to the user.
pub fn quick_prompt(number: usize) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|index| QUICK_PROMPTS.get(index))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_is_one_based() {
        assert_eq!(quick_prompt(1), Some(QUICK_PROMPTS[0]));
        assert_eq!(quick_prompt(6), Some(QUICK_PROMPTS[5]));
        assert_eq!(quick_prompt(0), None);
        assert_eq!(quick_prompt(7), None);
    }
}
