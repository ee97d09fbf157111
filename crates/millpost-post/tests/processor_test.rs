use millpost_core::{
    Command, MeasurementSystem, MovementType, PartialPosition, PostError, Position, ProgramInfo,
    RadiusCompensation, SpindleDirection, Tool,
};
use millpost_post::{
    post_process, Job, JobRunner, JobSection, PostProcessor, PostWarning, Record, RouterPost,
    RunState,
};
use millpost_settings::{PostConfig, RouterModel, RouterSettings};

fn rapid(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Record {
    Record::Rapid { x, y, z }
}

fn linear(x: Option<f64>, y: Option<f64>, z: Option<f64>, feed: f64) -> Record {
    Record::Linear { x, y, z, feed }
}

fn section(tool: Tool, records: Vec<Record>) -> JobSection {
    JobSection {
        tool,
        force_tool_change: false,
        comment: None,
        records,
    }
}

fn program() -> ProgramInfo {
    ProgramInfo {
        name: "1001".to_string(),
        comment: "pocket test".to_string(),
        ..ProgramInfo::default()
    }
}

fn job(sections: Vec<JobSection>) -> Job {
    Job {
        program: program(),
        initial_position: None,
        sections,
    }
}

fn lines(program: &str) -> Vec<&str> {
    program.lines().collect()
}

#[test]
fn test_first_section_with_probe() {
    let job = job(vec![section(
        Tool::new(1, "6mm flat", 12000.0),
        vec![
            rapid(Some(0.0), Some(0.0), Some(5.0)),
            linear(None, None, Some(-1.0), 300.0),
            linear(Some(10.0), None, None, 300.0),
        ],
    )]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    assert_eq!(
        lines(&output.program),
        vec![
            "(1001)",
            "(pocket test)",
            "G90 G94 G17",
            "G21",
            "G90 G53 G0 Z-1",
            "(MSG, Tool change: insert T1 6mm flat)",
            "M0",
            "(MSG, Attach the probe clip and place the touch plate under the bit)",
            "M0",
            "G91 G38.2 Z-95 F100",
            "G90",
            "G10 L20 P1 Z0.5",
            "G90 G53 G0 Z-1",
            "(MSG, Set router speed to 12000 RPM and switch the router on)",
            "M0",
            "M3 S12000",
            "X0 Y0 Z5",
            "G1 Z-1 F300",
            "X10",
            "G90 G53 G0 Z-1",
            "M5",
            "M30",
        ]
    );
    assert!(output.warnings.is_empty());
}

#[test]
fn test_same_tool_skips_change_sequence() {
    let job = job(vec![
        section(
            Tool::new(1, "6mm flat", 12000.0),
            vec![rapid(Some(0.0), Some(0.0), Some(5.0))],
        ),
        section(
            Tool::new(1, "6mm flat", 12000.0),
            vec![rapid(None, None, Some(5.0))],
        ),
    ]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    let lines = lines(&output.program);
    let second = lines.iter().position(|l| *l == "X0 Y0 Z5").unwrap() + 1;

    // Only the spindle start restated, then the move with modal state forced
    assert_eq!(&lines[second..second + 2], &["M3 S12000", "G0 Z5"]);
    assert_eq!(lines.iter().filter(|l| **l == "M0").count(), 3);
}

#[test]
fn test_tool_change_order() {
    let job = job(vec![
        section(
            Tool::new(1, "6mm flat", 12000.0),
            vec![rapid(Some(0.0), Some(0.0), Some(5.0))],
        ),
        section(
            Tool::new(2, "3mm ball", 18000.0),
            vec![rapid(Some(20.0), Some(0.0), None)],
        ),
    ]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    let lines = lines(&output.program);
    let start = lines.iter().position(|l| *l == "X0 Y0 Z5").unwrap() + 1;
    assert_eq!(
        &lines[start..start + 13],
        &[
            "G90 G53 G0 Z-1",
            "(MSG, Tool change: insert T2 3mm ball)",
            "M0",
            "(MSG, Attach the probe clip and place the touch plate under the bit)",
            "M0",
            "G91 G38.2 Z-95 F100",
            "G90",
            "G10 L20 P1 Z0.5",
            "G90 G53 G0 Z-1",
            "(MSG, Set router speed to 18000 RPM and switch the router on)",
            "M0",
            "M3 S18000",
            "X20 Y0",
        ]
    );
}

#[test]
fn test_forced_tool_change() {
    let mut second = section(
        Tool::new(1, "6mm flat", 12000.0),
        vec![rapid(None, None, Some(5.0))],
    );
    second.force_tool_change = true;
    let job = job(vec![
        section(
            Tool::new(1, "6mm flat", 12000.0),
            vec![rapid(None, None, Some(5.0))],
        ),
        second,
    ]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    let inserts = output
        .program
        .lines()
        .filter(|l| l.starts_with("(MSG, Tool change"))
        .count();
    assert_eq!(inserts, 2);
}

#[test]
fn test_manual_touch_off() {
    let mut config = PostConfig::default();
    config.tool_change.probing_tool = false;
    let job = job(vec![section(Tool::new(1, "", 12000.0), vec![])]);

    let output = post_process(&job, config).unwrap();
    let lines = lines(&output.program);
    assert!(!output.program.contains("G38.2"));
    let touch = lines
        .iter()
        .position(|l| *l == "(MSG, Jog Z down until the bit touches the stock surface)")
        .unwrap();
    assert_eq!(&lines[touch + 1..touch + 4], &["M0", "G10 L20 P1 Z0", "G90 G53 G0 Z-1"]);
}

#[test]
fn test_prompts_disabled() {
    let mut config = PostConfig::default();
    config.tool_change.prompts_enabled = false;
    let job = job(vec![section(Tool::new(4, "v-bit", 16000.0), vec![])]);

    let output = post_process(&job, config).unwrap();
    assert!(!output.program.contains("M0"));
    assert!(output.program.contains("(T4 v-bit)\nM3 S16000\n"));
}

#[test]
fn test_router_dial_hint() {
    let config = PostConfig {
        router: RouterSettings::with_model(RouterModel::MakitaRt0701c),
        ..PostConfig::default()
    };
    let job = job(vec![section(Tool::new(1, "", 14500.0), vec![])]);

    let output = post_process(&job, config).unwrap();
    assert!(output
        .program
        .contains("(MSG, Set router speed to 14500 RPM (dial 2.5) and switch the router on)"));
}

#[test]
fn test_sequence_numbers() {
    let mut config = PostConfig::default();
    config.output.sequence_numbers = true;
    let job = job(vec![section(Tool::new(1, "", 12000.0), vec![])]);

    let output = post_process(&job, config).unwrap();
    let lines = lines(&output.program);
    assert_eq!(
        &lines[..5],
        &[
            "(1001)",
            "(pocket test)",
            "N10 G90 G94 G17",
            "N11 G21",
            "N12 G90 G53 G0 Z-1",
        ]
    );
    // Comment lines stay unnumbered
    assert!(!lines.iter().any(|l| l.starts_with('N') && l.contains('(')));
}

#[test]
fn test_sequence_numbers_disabled() {
    let job = job(vec![section(Tool::new(1, "", 12000.0), vec![])]);
    let output = post_process(&job, PostConfig::default()).unwrap();
    assert!(output.program.lines().all(|l| !l.starts_with('N')));
}

#[test]
fn test_non_metric_run_is_fatal() {
    let mut job = job(vec![section(
        Tool::new(1, "", 12000.0),
        vec![rapid(Some(1.0), Some(1.0), Some(1.0))],
    )]);
    job.program.unit = MeasurementSystem::Imperial;

    let mut post = RouterPost::new(PostConfig::default());
    let err = JobRunner::new(&job).replay(&mut post).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(post.state(), RunState::Failed);
    assert!(post.lines().is_empty());
}

#[test]
fn test_radius_compensation_aborts_job() {
    let job = job(vec![section(
        Tool::new(1, "", 12000.0),
        vec![
            Record::RadiusCompensation {
                mode: RadiusCompensation::Right,
            },
            rapid(Some(1.0), None, None),
        ],
    )]);

    let mut post = RouterPost::new(PostConfig::default());
    let err = JobRunner::new(&job).replay(&mut post).unwrap_err();
    assert!(err.is_fatal());
    assert!(!post.lines().iter().any(|l| l.contains("X1")));
}

#[test]
fn test_dwell_warning_reported() {
    let job = job(vec![section(
        Tool::new(1, "", 12000.0),
        vec![Record::Dwell { seconds: 250000.0 }],
    )]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    assert!(output.program.contains("G4 P99999.999"));
    assert_eq!(
        output.warnings,
        vec![PostWarning::DwellClamped {
            requested: 250000.0,
            clamped: 99999.999
        }]
    );
}

#[test]
fn test_short_dwell_never_rounds_to_zero() {
    let job = job(vec![section(
        Tool::new(1, "", 12000.0),
        vec![Record::Dwell { seconds: 0.0001 }],
    )]);

    let mut config = PostConfig::default();
    config.output.dwell_decimals = 0;
    let output = post_process(&job, config).unwrap();
    assert!(output.program.contains("G4 P0.001\n"));
    assert_eq!(
        output.warnings,
        vec![PostWarning::DwellClamped {
            requested: 0.0001,
            clamped: 0.001
        }]
    );
}

#[test]
fn test_unsupported_commands_silent() {
    let job = job(vec![section(
        Tool::new(1, "", 12000.0),
        vec![
            Record::Command {
                command: Command::PalletChange,
            },
            Record::Command {
                command: Command::CoolantOn,
            },
            Record::Command {
                command: Command::Stop,
            },
        ],
    )]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    let lines = lines(&output.program);
    let spindle = lines.iter().position(|l| *l == "M3 S12000").unwrap();
    assert_eq!(lines[spindle + 1], "M0");
    assert_eq!(lines[spindle + 2], "G90 G53 G0 Z-1");
}

#[test]
fn test_spindle_speed_is_modal() {
    let job = job(vec![section(
        Tool::new(1, "", 12000.0),
        vec![
            Record::SpindleSpeed { rpm: 12000.0 },
            Record::SpindleSpeed { rpm: 15000.0 },
            Record::SpindleSpeed { rpm: 15000.0 },
            rapid(Some(1.0), None, None),
        ],
    )]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    let lines = lines(&output.program);
    let spindle = lines.iter().position(|l| *l == "M3 S12000").unwrap();
    assert_eq!(lines[spindle + 1], "S15000");
    assert_eq!(lines[spindle + 2], "X1");
    assert_eq!(lines.iter().filter(|l| l.contains("S1")).count(), 2);
}

#[test]
fn test_counter_clockwise_tool() {
    let tool = Tool {
        direction: SpindleDirection::CounterClockwise,
        ..Tool::new(1, "", 18000.0)
    };
    let job = job(vec![section(
        tool,
        vec![
            Record::Command {
                command: Command::StopSpindle,
            },
            Record::Command {
                command: Command::StartSpindle,
            },
        ],
    )]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    assert!(output.program.contains("M4 S18000\nM5\nM4 S18000\n"));
    assert!(!output.program.contains("M3"));
}

#[test]
fn test_job_comment_record() {
    let job = job(vec![section(
        Tool::new(1, "", 12000.0),
        vec![Record::Comment {
            text: "Finish (pass 2)".to_string(),
        }],
    )]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    assert!(output.program.contains("M3 S12000\n(Finish pass 2)\n"));
}

#[test]
fn test_movement_comments_toggle() {
    let job = job(vec![section(
        Tool::new(1, "", 12000.0),
        vec![
            Record::Movement {
                movement: MovementType::Cutting,
            },
            linear(Some(1.0), None, None, 300.0),
        ],
    )]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    assert!(output.program.contains("(cutting)\nG1 X1 F300\n"));

    let mut config = PostConfig::default();
    config.output.movement_comments = false;
    let output = post_process(&job, config).unwrap();
    assert!(!output.program.contains("(cutting)"));
    assert!(output.program.contains("M3 S12000\nG1 X1 F300\n"));
}

#[test]
fn test_control_characters_stay_inside_comments() {
    let job = job(vec![section(
        Tool::new(2, "6mm \u{d8} flat\r\nM3 S30000", 12000.0),
        vec![Record::Comment {
            text: "Pocket\nG0 Z-50".to_string(),
        }],
    )]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    let lines = lines(&output.program);
    assert!(lines.contains(&"(MSG, Tool change: insert T2 6mm flat M3 S30000)"));
    assert!(lines.contains(&"(Pocket G0 Z-50)"));
    assert!(!lines.iter().any(|l| l.starts_with("M3 S30000") || l.starts_with("G0")));
    assert!(output.program.is_ascii());
}

#[test]
fn test_half_rpm_prompt_matches_spindle_word() {
    let job = job(vec![section(Tool::new(1, "", 12500.5), vec![])]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    let lines = lines(&output.program);
    let spindle = lines.iter().position(|l| *l == "M3 S12501").unwrap();
    assert_eq!(
        lines[spindle - 2],
        "(MSG, Set router speed to 12501 RPM and switch the router on)"
    );
}

#[test]
fn test_start_spindle_command_uses_section_tool() {
    let job = job(vec![section(
        Tool::new(1, "", 12000.0),
        vec![
            Record::Command {
                command: Command::StopSpindle,
            },
            Record::Command {
                command: Command::StartSpindle,
            },
        ],
    )]);

    let output = post_process(&job, PostConfig::default()).unwrap();
    assert!(output.program.contains("M3 S12000\nM5\nM3 S12000\n"));
}

#[test]
fn test_consecutive_arcs_through_job() {
    let job = Job {
        initial_position: Some(Position::new(0.0, 0.0, -1.0)),
        ..job(vec![section(
            Tool::new(1, "", 12000.0),
            vec![
                Record::Circular {
                    clockwise: true,
                    center: Position::new(5.0, 0.0, -1.0),
                    x: Some(10.0),
                    y: Some(0.0),
                    z: None,
                    feed: 600.0,
                },
                Record::Circular {
                    clockwise: true,
                    center: Position::new(5.0, 0.0, -1.0),
                    x: Some(0.0),
                    y: Some(0.0),
                    z: None,
                    feed: 600.0,
                },
            ],
        )])
    };

    let output = post_process(&job, PostConfig::default()).unwrap();
    let arcs: Vec<&str> = output
        .program
        .lines()
        .filter(|l| !l.starts_with('(') && l.contains('I'))
        .collect();
    assert_eq!(arcs, vec!["G2 X10 Y0 Z-1 I5 J0 F600", "X0 Y0 I-5 J0 F600"]);
}

#[test]
fn test_words_without_separator() {
    let mut config = PostConfig::default();
    config.output.separate_words = false;
    let job = job(vec![section(
        Tool::new(1, "", 12000.0),
        vec![rapid(Some(3.0), Some(4.0), Some(5.0))],
    )]);

    let output = post_process(&job, config).unwrap();
    assert!(output.program.contains("\nG90G94G17\n"));
    assert!(output.program.contains("\nM3S12000\nX3Y4Z5\n"));
}

#[test]
fn test_callbacks_after_close_rejected() {
    let mut post = RouterPost::new(PostConfig::default());
    post.on_open(&program()).unwrap();
    post.on_close().unwrap();
    let err = post
        .on_rapid(&PartialPosition::xyz(1.0, 2.0, 3.0))
        .unwrap_err();
    assert_eq!(
        err,
        PostError::NotOpen {
            callback: "on_rapid".to_string()
        }
    );
}

#[test]
fn test_reopen_starts_fresh_run() {
    let mut post = RouterPost::new(PostConfig::default());
    post.on_open(&program()).unwrap();
    post.on_rapid(&PartialPosition::xyz(1.0, 2.0, 3.0)).unwrap();
    post.on_close().unwrap();

    post.on_open(&program()).unwrap();
    post.on_rapid(&PartialPosition::xyz(1.0, 2.0, 3.0)).unwrap();
    assert_eq!(post.lines().last().map(String::as_str), Some("G0 X1 Y2 Z3"));
    assert_eq!(post.lines().len(), 5);
}
