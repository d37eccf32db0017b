//! Reflection prompts

use crate::journal::JournalEntry;

pub const SYSTEM_PROMPT: &str = "You are a compassionate, CBT-informed helper. \
Use supportive, non-judgmental, inclusive language. \
Be LGBTQ+ affirming and trauma-informed. \
Do NOT diagnose, pathologize, or give medical or legal advice. \
If the entry suggests risk of harm to self or others, or the intensity is very high, \
gently encourage reaching out to a trusted person or local crisis resources. \
Avoid moralizing and 'should' statements. Keep the tone warm and every section concise.";

/// Build the user prompt for one entry
pub fn build_prompt(entry: &JournalEntry) -> String {
    format!(
        r#"I am practicing cognitive behavioral therapy. Here is my journal entry:

- Date: {date}
- Event: {event}
- Automatic Thought: {thought}
- Emotion(s): {emotions}
- Intensity: {intensity}/7
- Identified Distortion: {distortion}
- My Current Reframe: {reframe}

Respond with these SECTIONS, using the exact headings. Aim for 180-300 words.

1) Warm Reflection
- 2-3 validating sentences in plain, non-clinical language.

2) Distortion Deep-Dive
- Explain the distortion in plain words and how it usually shows up.
- Link it to THIS entry with 1-2 concrete references to the thought or event.

3) Emotion Check
- What might this emotion be signalling or protecting?
- Normalize the reported intensity ({intensity}/7) in one sentence.
- Offer ONE quick grounding step (paced breathing, brief movement, kind self-talk).

4) Evidence Scan
- Two short bullets of evidence that SUPPORT the automatic thought.
- Two short bullets of evidence that CHALLENGE it.

5) Balanced Reframe Options
- THREE numbered alternative reframes, kind, realistic and specific to this situation.

6) Tiny Next Step
- One step that takes under 2 minutes and is within my control.

7) Gentle Safety Note (only if warranted)
- Include this only if the intensity is 6/7 or higher or the entry contains language about self-harm, hopelessness or danger to others. One compassionate sentence suggesting a trusted person, a clinician or local emergency services. No hotline numbers.

Style: no diagnoses, no moralizing, no "as an AI". Do not repeat these instructions."#,
        date = entry.date,
        event = entry.event,
        thought = entry.thought,
        emotions = entry.emotion_path(),
        intensity = entry.emotion_intensity,
        distortion = entry.cbt_distortion,
        reframe = entry.reframing,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_entry_fields() {
        let entry = JournalEntry::new("2025-08-25", "Presentation went badly", "I'm a failure", "Sadness")
            .with_secondary("Hurt")
            .with_intensity(6)
            .with_distortion("Labeling")
            .with_reframing("One talk does not define me");

        let prompt = build_prompt(&entry);
        assert!(prompt.contains("- Event: Presentation went badly"));
        assert!(prompt.contains("- Emotion(s): Sadness → Hurt"));
        assert!(prompt.contains("- Intensity: 6/7"));
        assert!(prompt.contains("(6/7)"));
        assert!(prompt.contains("- Identified Distortion: Labeling"));
    }
}
