use crate::script::ScriptLine;

/// Template wrapped around a raw character description when the reference is
/// generated rather than uploaded.
pub fn character_sheet_prompt(description: &str) -> String {
    format!(
        "Create a full-body, forward-facing character reference sheet on a plain neutral \
         background for the following character: {}. Keep the whole figure in frame with \
         clean, even lighting so the sheet can anchor later storyboard panels.",
        description.trim()
    )
}

/// Composite prompt for one panel: a fixed consistency instruction embedding
/// the scene, plus a caption instruction when the line carried one.
pub fn panel_prompt(line: &ScriptLine) -> String {
    let mut prompt = format!(
        "Using the supplied character reference image, draw one dynamic storyboard panel \
         that keeps the character visually consistent with the reference. Scene: {}.",
        line.scene
    );
    if let Some(caption) = &line.caption {
        prompt.push_str(&format!(
            " Render the exact text \"{caption}\" legibly inside a speech bubble or caption \
             box within the panel."
        ));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;

    #[test]
    fn captioned_line_gets_scene_and_caption_instructions() {
        let lines = parse_script("A | B");
        let prompt = panel_prompt(&lines[0]);

        assert!(prompt.contains("Scene: A."));
        assert!(prompt.contains("\"B\""));
        assert!(prompt.contains("speech bubble"));
    }

    #[test]
    fn uncaptioned_line_gets_no_caption_instruction() {
        let lines = parse_script("A");
        let prompt = panel_prompt(&lines[0]);

        assert!(prompt.contains("Scene: A."));
        assert!(!prompt.contains("speech bubble"));
    }

    #[test]
    fn character_sheet_prompt_wraps_the_raw_description() {
        let prompt = character_sheet_prompt("  a grumpy badger detective ");
        assert!(prompt.contains("a grumpy badger detective"));
        assert!(prompt.contains("full-body, forward-facing"));
    }
}
