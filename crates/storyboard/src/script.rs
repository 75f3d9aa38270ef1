/// One unit of the storyboard work plan: the verbatim source line, its scene
/// description, and the optional caption after the first `|`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptLine {
    pub raw: String,
    pub scene: String,
    pub caption: Option<String>,
}

/// Split a script into its ordered work plan. Lines that are blank after
/// trimming are dropped; each remaining line splits on the FIRST `|` into a
/// scene description and an optional caption, both trimmed. There is no
/// escaping for a literal `|` inside the scene.
pub fn parse_script(script: &str) -> Vec<ScriptLine> {
    script
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once('|') {
            Some((scene, caption)) => {
                let caption = caption.trim();
                ScriptLine {
                    raw: line.to_string(),
                    scene: scene.trim().to_string(),
                    caption: (!caption.is_empty()).then(|| caption.to_string()),
                }
            }
            None => ScriptLine {
                raw: line.to_string(),
                scene: line.trim().to_string(),
                caption: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_blank_lines_and_trims_fields() {
        let lines = parse_script("  The fox wakes up  \n\n   \n  Dawn | Good morning!  \n");

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].scene, "The fox wakes up");
        assert_eq!(lines[0].caption, None);
        assert_eq!(lines[1].scene, "Dawn");
        assert_eq!(lines[1].caption.as_deref(), Some("Good morning!"));
    }

    #[test]
    fn keeps_the_raw_line_verbatim() {
        let lines = parse_script("  Dawn | Good morning!  ");
        assert_eq!(lines[0].raw, "  Dawn | Good morning!  ");
    }

    #[test]
    fn splits_on_the_first_pipe_only() {
        let lines = parse_script("A | B | C");
        assert_eq!(lines[0].scene, "A");
        assert_eq!(lines[0].caption.as_deref(), Some("B | C"));
    }

    #[test]
    fn empty_caption_after_pipe_means_no_caption() {
        let lines = parse_script("A |   ");
        assert_eq!(lines[0].scene, "A");
        assert_eq!(lines[0].caption, None);
    }

    #[test]
    fn all_blank_script_yields_empty_plan() {
        assert!(parse_script("\n   \n\t\n").is_empty());
    }
}
