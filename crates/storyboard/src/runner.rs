use crate::prompts::panel_prompt;
use crate::script::ScriptLine;
use crossbeam_channel::Sender;
use genimage::{GenerationRequest, ImageData, ImageProvider, ProviderError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("panel listener disconnected")]
    ListenerGone,
    #[error("{0}")]
    Systemic(ProviderError),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PanelState {
    Pending,
    Completed(ImageData),
    Failed(String),
}

/// One storyboard panel: its generated image (or failure) plus the verbatim
/// script line it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    pub id: Uuid,
    pub line: String,
    pub state: PanelState,
}

#[derive(Clone, Debug)]
pub enum RunEvent {
    /// A Pending placeholder for the line about to be generated. `index` is
    /// always the current length of the observer's panel list.
    PanelQueued { index: usize, panel: Panel },
    /// Final state for the panel at `index`, replacing the placeholder.
    PanelFinished { index: usize, panel: Panel },
    RunCompleted { total: usize },
    /// The run stopped early; panels finalized so far remain valid.
    RunFailed { message: String },
}

/// Generate one panel per script line, strictly in order, one call at a time.
///
/// Each line gets a Pending placeholder event before its provider call and a
/// final event after it. Per-line failures (transport, bad response, no image
/// returned) mark that panel Failed and the run continues. A configuration
/// error is systemic — no later line could succeed — so the run stops early
/// after finalizing the in-flight panel. An empty work plan completes as a
/// no-op.
pub fn run_panels(
    provider: &dyn ImageProvider,
    character: &ImageData,
    lines: &[ScriptLine],
    events: &Sender<RunEvent>,
) -> Result<usize, RunError> {
    for (index, line) in lines.iter().enumerate() {
        let id = Uuid::new_v4();
        let pending = Panel {
            id,
            line: line.raw.clone(),
            state: PanelState::Pending,
        };
        events
            .send(RunEvent::PanelQueued {
                index,
                panel: pending,
            })
            .map_err(|_| RunError::ListenerGone)?;

        let request = GenerationRequest::text(panel_prompt(line)).with_reference(character.clone());
        let state = match provider.generate(&request) {
            Ok(image) => PanelState::Completed(image),
            Err(err @ ProviderError::Configuration(_)) => {
                let message = err.to_string();
                tracing::error!(
                    target: "storyboard",
                    "Run aborted at panel {}: {}",
                    index + 1,
                    message
                );
                let _ = events.send(RunEvent::PanelFinished {
                    index,
                    panel: Panel {
                        id,
                        line: line.raw.clone(),
                        state: PanelState::Failed(message.clone()),
                    },
                });
                let _ = events.send(RunEvent::RunFailed { message });
                return Err(RunError::Systemic(err));
            }
            Err(err) => {
                tracing::warn!(
                    target: "storyboard",
                    "Panel {} failed: {}",
                    index + 1,
                    err
                );
                PanelState::Failed(err.to_string())
            }
        };
        events
            .send(RunEvent::PanelFinished {
                index,
                panel: Panel {
                    id,
                    line: line.raw.clone(),
                    state,
                },
            })
            .map_err(|_| RunError::ListenerGone)?;
    }

    events
        .send(RunEvent::RunCompleted { total: lines.len() })
        .map_err(|_| RunError::ListenerGone)?;
    Ok(lines.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;
    use crossbeam_channel::unbounded;
    use genimage::{MockConfig, MockImageProvider, MockOutcome};

    fn character() -> ImageData {
        ImageData::new("image/png", "cmVmZXJlbmNl")
    }

    /// Drain events the way the UI does: push on PanelQueued, replace on
    /// PanelFinished.
    fn replay(events: &crossbeam_channel::Receiver<RunEvent>) -> (Vec<Panel>, Vec<RunEvent>) {
        let mut panels: Vec<Panel> = Vec::new();
        let mut raw = Vec::new();
        while let Ok(event) = events.try_recv() {
            match &event {
                RunEvent::PanelQueued { index, panel } => {
                    assert_eq!(*index, panels.len(), "placeholder must append in order");
                    panels.push(panel.clone());
                }
                RunEvent::PanelFinished { index, panel } => {
                    panels[*index] = panel.clone();
                }
                _ => {}
            }
            raw.push(event);
        }
        (panels, raw)
    }

    #[test]
    fn one_sequential_call_per_line() {
        let provider = MockImageProvider::new(MockConfig::default());
        let lines = parse_script("one\ntwo\nthree");
        let (tx, rx) = unbounded();

        let total = run_panels(&provider, &character(), &lines, &tx).unwrap();
        drop(tx);

        assert_eq!(total, 3);
        assert_eq!(provider.call_count(), 3);
        for request in provider.requests() {
            assert_eq!(request.reference.as_ref(), Some(&character()));
        }
        let (panels, raw) = replay(&rx);
        assert_eq!(panels.len(), 3);
        assert!(panels
            .iter()
            .all(|p| matches!(p.state, PanelState::Completed(_))));
        assert!(matches!(
            raw.last(),
            Some(RunEvent::RunCompleted { total: 3 })
        ));
    }

    #[test]
    fn failed_line_does_not_stop_the_run() {
        let provider = MockImageProvider::new(MockConfig {
            outcomes: vec![
                MockOutcome::Image(MockImageProvider::placeholder_image()),
                MockOutcome::NoImage,
                MockOutcome::Image(MockImageProvider::placeholder_image()),
            ],
        });
        let lines = parse_script("one\ntwo | Ouch!\nthree");
        let (tx, rx) = unbounded();

        run_panels(&provider, &character(), &lines, &tx).unwrap();
        drop(tx);

        assert_eq!(provider.call_count(), 3);
        let (panels, _) = replay(&rx);
        assert!(matches!(panels[0].state, PanelState::Completed(_)));
        assert!(matches!(panels[1].state, PanelState::Failed(_)));
        assert_eq!(panels[1].line, "two | Ouch!");
        assert!(matches!(panels[2].state, PanelState::Completed(_)));
    }

    #[test]
    fn transport_failure_is_per_line_not_systemic() {
        let provider = MockImageProvider::new(MockConfig {
            outcomes: vec![MockOutcome::Transport("connection reset".into())],
        });
        let lines = parse_script("one\ntwo");
        let (tx, rx) = unbounded();

        run_panels(&provider, &character(), &lines, &tx).unwrap();
        drop(tx);

        assert_eq!(provider.call_count(), 2);
        let (panels, _) = replay(&rx);
        assert!(
            matches!(&panels[0].state, PanelState::Failed(msg) if msg.contains("connection reset"))
        );
        assert!(matches!(panels[1].state, PanelState::Completed(_)));
    }

    #[test]
    fn configuration_error_aborts_and_keeps_finished_panels() {
        let provider = MockImageProvider::new(MockConfig {
            outcomes: vec![
                MockOutcome::Image(MockImageProvider::placeholder_image()),
                MockOutcome::Configuration("API key revoked".into()),
            ],
        });
        let lines = parse_script("one\ntwo\nthree");
        let (tx, rx) = unbounded();

        let err = run_panels(&provider, &character(), &lines, &tx).unwrap_err();
        drop(tx);

        assert!(matches!(err, RunError::Systemic(_)));
        // The third line is never attempted.
        assert_eq!(provider.call_count(), 2);
        let (panels, raw) = replay(&rx);
        assert_eq!(panels.len(), 2);
        assert!(matches!(panels[0].state, PanelState::Completed(_)));
        assert!(matches!(panels[1].state, PanelState::Failed(_)));
        assert!(matches!(raw.last(), Some(RunEvent::RunFailed { .. })));
    }

    #[test]
    fn empty_plan_completes_as_a_no_op() {
        let provider = MockImageProvider::new(MockConfig::default());
        let (tx, rx) = unbounded();

        let total = run_panels(&provider, &character(), &[], &tx).unwrap();
        drop(tx);

        assert_eq!(total, 0);
        assert_eq!(provider.call_count(), 0);
        let (panels, raw) = replay(&rx);
        assert!(panels.is_empty());
        assert!(matches!(
            raw.as_slice(),
            [RunEvent::RunCompleted { total: 0 }]
        ));
    }

    #[test]
    fn composite_prompts_reach_the_provider() {
        let provider = MockImageProvider::new(MockConfig::default());
        let lines = parse_script("A | B");
        let (tx, _rx) = unbounded();

        run_panels(&provider, &character(), &lines, &tx).unwrap();

        let requests = provider.requests();
        assert!(requests[0].prompt.contains("Scene: A."));
        assert!(requests[0].prompt.contains("\"B\""));
    }
}
