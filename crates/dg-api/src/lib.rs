use std::collections::BTreeMap;

use dg_compiler::{compile_project_from_source_map, CompiledProject};
use dg_core::{DialogueConfig, DialogueError, SequenceManifest, SequencerSnapshot};
use dg_runtime::{
    CallbackPolicy, DialogueSequencer, DialogueSurface, PopupSurface, SequencerOptions,
};

/// Sequence played when a project declares no `*.sequence.xml`: every
/// dialogue in name order.
pub const IMPLICIT_SEQUENCE_NAME: &str = "default";
pub const DEFAULT_SEQUENCE_NAME: &str = "main";

/// Per-run adjustments applied on top of the authored sequence config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub typing_interval_ms: Option<u64>,
    pub fade_in_ms: Option<u64>,
    pub fade_out_ms: Option<u64>,
    pub auto_advance: Option<bool>,
    pub popups_after_dialogue: Option<bool>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: DialogueConfig) -> DialogueConfig {
        DialogueConfig {
            typing_interval_ms: self.typing_interval_ms.unwrap_or(config.typing_interval_ms),
            fade_in_ms: self.fade_in_ms.unwrap_or(config.fade_in_ms),
            fade_out_ms: self.fade_out_ms.unwrap_or(config.fade_out_ms),
            auto_advance: self.auto_advance.unwrap_or(config.auto_advance),
            popups_after_dialogue: self
                .popups_after_dialogue
                .unwrap_or(config.popups_after_dialogue),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateSequencerOptions {
    pub sources: BTreeMap<String, String>,
    pub sequence: Option<String>,
    pub overrides: ConfigOverrides,
    pub callback_policy: CallbackPolicy,
}

#[derive(Debug, Clone)]
pub struct ResumeSequencerOptions {
    pub sources: BTreeMap<String, String>,
    pub snapshot: SequencerSnapshot,
    pub overrides: ConfigOverrides,
    pub callback_policy: CallbackPolicy,
}

pub fn compile_project(
    sources: &BTreeMap<String, String>,
) -> Result<CompiledProject, DialogueError> {
    compile_project_from_source_map(sources)
}

/// Picks the sequence to play: the explicit name, else `main`, else the only
/// declared sequence, else an implicit one over every dialogue.
pub fn resolve_sequence(
    project: &CompiledProject,
    explicit: Option<&str>,
) -> Result<SequenceManifest, DialogueError> {
    if let Some(name) = explicit {
        if let Some(manifest) = project.sequences.get(name) {
            return Ok(manifest.clone());
        }
        if name == IMPLICIT_SEQUENCE_NAME && project.sequences.is_empty() {
            return implicit_sequence(project);
        }
        return Err(DialogueError::new(
            "API_SEQUENCE_NOT_FOUND",
            format!("Sequence \"{}\" is not declared.", name),
        ));
    }

    if let Some(manifest) = project.sequences.get(DEFAULT_SEQUENCE_NAME) {
        return Ok(manifest.clone());
    }

    let mut declared = project.sequences.values();
    match (declared.next(), declared.next()) {
        (None, _) => implicit_sequence(project),
        (Some(only), None) => Ok(only.clone()),
        _ => Err(DialogueError::new(
            "API_SEQUENCE_REQUIRED",
            format!(
                "Several sequences are declared ({}); choose one explicitly.",
                project
                    .sequences
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )),
    }
}

fn implicit_sequence(project: &CompiledProject) -> Result<SequenceManifest, DialogueError> {
    if project.scripts.is_empty() {
        return Err(DialogueError::new(
            "API_NO_DIALOGUES",
            "The project does not contain any dialogue.",
        ));
    }
    Ok(SequenceManifest {
        name: IMPLICIT_SEQUENCE_NAME.to_string(),
        scripts: project.scripts.keys().cloned().collect(),
        popups: Vec::new(),
        config: DialogueConfig::default(),
    })
}

pub fn build_sequencer(
    project: &CompiledProject,
    manifest: &SequenceManifest,
    overrides: ConfigOverrides,
    callback_policy: CallbackPolicy,
    surface: Box<dyn DialogueSurface>,
    popup_surface: Box<dyn PopupSurface>,
) -> Result<DialogueSequencer, DialogueError> {
    let scripts = project.scripts_for(manifest)?;
    let config = overrides.apply(manifest.config);
    tracing::debug!(sequence = %manifest.name, scripts = scripts.len(), ?config, "build sequencer");
    Ok(DialogueSequencer::new(
        SequencerOptions {
            name: manifest.name.clone(),
            scripts,
            popups: manifest.popups.clone(),
            config,
            callback_policy,
        },
        surface,
        popup_surface,
    ))
}

/// Compiles `sources`, builds the sequencer and starts its first dialogue.
pub fn create_sequencer_from_sources(
    options: CreateSequencerOptions,
    surface: Box<dyn DialogueSurface>,
    popup_surface: Box<dyn PopupSurface>,
) -> Result<DialogueSequencer, DialogueError> {
    let project = compile_project(&options.sources)?;
    let manifest = resolve_sequence(&project, options.sequence.as_deref())?;
    let mut sequencer = build_sequencer(
        &project,
        &manifest,
        options.overrides,
        options.callback_policy,
        surface,
        popup_surface,
    )?;
    sequencer.start_next()?;
    Ok(sequencer)
}

pub fn resume_sequencer_from_sources(
    options: ResumeSequencerOptions,
    surface: Box<dyn DialogueSurface>,
    popup_surface: Box<dyn PopupSurface>,
) -> Result<DialogueSequencer, DialogueError> {
    let project = compile_project(&options.sources)?;
    let manifest = resolve_sequence(&project, Some(&options.snapshot.sequence_name))?;
    let mut sequencer = build_sequencer(
        &project,
        &manifest,
        options.overrides,
        options.callback_policy,
        surface,
        popup_surface,
    )?;
    sequencer.resume(&options.snapshot)?;
    Ok(sequencer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::DialogueEvent;
    use dg_runtime::{BufferPopupSurface, BufferSurface};

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn surfaces() -> (Box<dyn DialogueSurface>, Box<dyn PopupSurface>) {
        (
            Box::new(BufferSurface::default()),
            Box::new(BufferPopupSurface::default()),
        )
    }

    fn two_dialogues() -> BTreeMap<String, String> {
        map(&[
            (
                "a.dialogue.xml",
                r#"<dialogue name="a"><entry>A1</entry></dialogue>"#,
            ),
            (
                "b.dialogue.xml",
                r#"<dialogue name="b"><entry>B1</entry></dialogue>"#,
            ),
        ])
    }

    #[test]
    fn implicit_sequence_plays_every_dialogue_in_name_order() {
        let project = compile_project(&two_dialogues()).expect("compile should pass");
        let manifest = resolve_sequence(&project, None).expect("sequence should resolve");
        assert_eq!(manifest.name, IMPLICIT_SEQUENCE_NAME);
        assert_eq!(manifest.scripts, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn resolve_sequence_prefers_main_then_single() {
        let mut sources = two_dialogues();
        sources.insert(
            "x.sequence.xml".to_string(),
            r#"<sequence name="x"><play dialogue="b"/></sequence>"#.to_string(),
        );
        let project = compile_project(&sources).expect("compile should pass");
        assert_eq!(
            resolve_sequence(&project, None).expect("single").name,
            "x"
        );

        sources.insert(
            "y.sequence.xml".to_string(),
            r#"<sequence name="y"><play dialogue="a"/></sequence>"#.to_string(),
        );
        let project = compile_project(&sources).expect("compile should pass");
        let error = resolve_sequence(&project, None).expect_err("ambiguous should fail");
        assert_eq!(error.code, "API_SEQUENCE_REQUIRED");
        assert_eq!(
            resolve_sequence(&project, Some("y")).expect("explicit").name,
            "y"
        );

        sources.insert(
            "main.sequence.xml".to_string(),
            r#"<sequence name="main"><play dialogue="a"/></sequence>"#.to_string(),
        );
        let project = compile_project(&sources).expect("compile should pass");
        assert_eq!(resolve_sequence(&project, None).expect("main").name, "main");
    }

    #[test]
    fn resolve_sequence_reports_unknown_and_empty_projects() {
        let project = compile_project(&two_dialogues()).expect("compile should pass");
        let error =
            resolve_sequence(&project, Some("nope")).expect_err("unknown should fail");
        assert_eq!(error.code, "API_SEQUENCE_NOT_FOUND");

        let empty = compile_project(&BTreeMap::new()).expect("empty project compiles");
        let error = resolve_sequence(&empty, None).expect_err("no dialogues should fail");
        assert_eq!(error.code, "API_NO_DIALOGUES");
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let config = ConfigOverrides {
            typing_interval_ms: Some(0),
            auto_advance: Some(false),
            ..ConfigOverrides::default()
        }
        .apply(DialogueConfig::default());
        assert_eq!(config.typing_interval_ms, 0);
        assert!(!config.auto_advance);
        assert!(config.popups_after_dialogue);
        assert_eq!(config.fade_in_ms, dg_core::DEFAULT_FADE_IN_MS);
    }

    #[test]
    fn create_sequencer_starts_first_dialogue() {
        let (surface, popup_surface) = surfaces();
        let mut sequencer = create_sequencer_from_sources(
            CreateSequencerOptions {
                sources: two_dialogues(),
                ..CreateSequencerOptions::default()
            },
            surface,
            popup_surface,
        )
        .expect("sequencer should build");

        assert!(sequencer.machine().is_in_dialogue());
        assert_eq!(
            sequencer.drain_event_log(),
            vec![DialogueEvent::DialogueStarted {
                name: "a".to_string()
            }]
        );
    }

    #[test]
    fn create_sequencer_propagates_compile_errors() {
        let (surface, popup_surface) = surfaces();
        let error = create_sequencer_from_sources(
            CreateSequencerOptions {
                sources: map(&[("a.dialogue.xml", "<dialogue name=\"a\"/>")]),
                ..CreateSequencerOptions::default()
            },
            surface,
            popup_surface,
        )
        .expect_err("empty dialogue should fail");
        assert_eq!(error.code, "COMPILE_SCRIPT_EMPTY");
    }

    #[test]
    fn resume_sequencer_restores_position_from_snapshot() {
        let sources = two_dialogues();
        let (surface, popup_surface) = surfaces();
        let mut sequencer = create_sequencer_from_sources(
            CreateSequencerOptions {
                sources: sources.clone(),
                overrides: ConfigOverrides {
                    auto_advance: Some(false),
                    ..ConfigOverrides::default()
                },
                ..CreateSequencerOptions::default()
            },
            surface,
            popup_surface,
        )
        .expect("sequencer should build");
        sequencer.settle();
        sequencer.set_story_flag("clues", 3);
        let snapshot = sequencer.snapshot().expect("snapshot should pass");

        let (surface, popup_surface) = surfaces();
        let resumed = resume_sequencer_from_sources(
            ResumeSequencerOptions {
                sources,
                snapshot,
                overrides: ConfigOverrides::default(),
                callback_policy: CallbackPolicy::default(),
            },
            surface,
            popup_surface,
        )
        .expect("resume should pass");
        assert_eq!(resumed.cursor(), 1);
        assert_eq!(resumed.story_flag("clues", 0), 3);
        assert!(resumed.machine().is_waiting_for_input());
    }
}
