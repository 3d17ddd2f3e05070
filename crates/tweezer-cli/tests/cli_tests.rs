//! CLI command parsing and pipeline file tests.
//!
//! Tests cover argument parsing (via clap `try_parse_from`) and the file
//! round-trips the commands perform, driven through the library crates.

// ============================================================================
// Pipeline file round-trips
// ============================================================================

mod pipeline_files {
    use std::fs;

    use tweezer_compile::{
        PassManagerBuilder, PlacementRequest, PlacementSolver, RecordedSolver, ScheduleStats,
        SteaneConfig,
    };
    use tweezer_ir::{CircuitStage, GateStream, LayeredCircuit, QubitId, parse_qobj};

    const BELL_QOBJ: &str = r#"{"experiments": [{"instructions": [
        {"name": "ry", "qubits": [0], "params": [1.5707963267948966]},
        {"name": "barrier", "qubits": [0, 1]},
        {"name": "cz", "qubits": [0, 1]},
        {"name": "rx", "qubits": [1], "params": [3.141592653589793]},
        {"name": "measure", "qubits": [0], "memory": [0]},
        {"name": "measure", "qubits": [1], "memory": [1]}
    ]}]}"#;

    // Solver output with metadata fields the scheduler does not use.
    const BELL_SOLUTION: &str = r#"{
        "sat": true, "n_t": 1, "n_q": 2, "no_transfer": false,
        "layers": [{
            "qubits": [{"id": 0, "a": 0, "x": 1, "y": 1, "c": 0, "r": 0},
                       {"id": 1, "a": 1, "x": 1, "y": 1, "c": 0, "r": 0}],
            "gates": [{"id": 0, "q0": 0, "q1": 1}]
        }]
    }"#;

    #[test]
    fn test_extract_writes_stream_and_program() {
        let dir = tempfile::tempdir().unwrap();
        let gates_path = dir.path().join("bell_gates.json");
        let program_path = dir.path().join("bell_program.json");

        let stream = parse_qobj(BELL_QOBJ).unwrap();
        let request = PlacementRequest::from_stream("bell", &stream);
        fs::write(&gates_path, serde_json::to_string_pretty(&stream).unwrap()).unwrap();
        fs::write(&program_path, serde_json::to_string_pretty(&request).unwrap()).unwrap();

        let stream: GateStream =
            serde_json::from_str(&fs::read_to_string(&gates_path).unwrap()).unwrap();
        assert_eq!(stream.len(), 5);
        assert_eq!(stream.get(0).unwrap().angle, 0.5);
        assert_eq!(stream.get(2).unwrap().angle, 1.0);

        let program: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&program_path).unwrap()).unwrap();
        assert_eq!(program["pairs"], serde_json::json!([[0, 1]]));
        assert_eq!(program["gate_ids"], serde_json::json!([1]));
    }

    #[test]
    fn test_schedule_then_encode_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let scheduled_path = dir.path().join("bell_scheduled.json");

        let stream = parse_qobj(BELL_QOBJ).unwrap();
        let request = PlacementRequest::from_stream("bell", &stream);
        let mut circuit = RecordedSolver::from_json(BELL_SOLUTION)
            .unwrap()
            .solve(&request.pairs, request.n_q)
            .unwrap();

        let (pm, mut props) = PassManagerBuilder::new().with_gate_stream(stream).build();
        pm.run(&mut circuit, &mut props).unwrap();
        let stats = props.get::<ScheduleStats>().unwrap();
        assert_eq!(stats.two_qubit_gates, 1);
        assert!(stats.overflow_layer);

        fs::write(&scheduled_path, circuit.to_json().unwrap()).unwrap();

        // The stage is not persisted; the encode command restores it.
        let mut loaded = LayeredCircuit::from_json(&fs::read_to_string(&scheduled_path).unwrap())
            .unwrap()
            .with_stage(CircuitStage::Scheduled);
        assert_eq!(loaded.num_gates(), 5);

        let (pm, mut props) = PassManagerBuilder::new()
            .with_steane(SteaneConfig::default())
            .with_verification(false)
            .build();
        pm.run(&mut loaded, &mut props).unwrap();

        assert_eq!(loaded.stage(), CircuitStage::Encoded);
        assert_eq!(loaded.n_q, 28);

        // Both logical qubits shared a site; their blocks must not overlap.
        let first = &loaded.layers[0];
        let q0 = first.record(QubitId(0)).unwrap();
        let q1 = first.record(QubitId(14)).unwrap();
        assert_ne!(q0.position(), q1.position());
        assert_eq!(q1.a, Some(1));
    }

    #[test]
    fn test_solution_for_other_program_is_rejected() {
        let mut stream = GateStream::new();
        stream.cz(QubitId(0), QubitId(1)).unwrap();
        stream.cz(QubitId(1), QubitId(0)).unwrap();
        let request = PlacementRequest::from_stream("twice", &stream);

        let solver = RecordedSolver::from_json(BELL_SOLUTION).unwrap();
        assert!(solver.solve(&request.pairs, request.n_q).is_err());
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand};

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "tweezer")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[arg(short, long, global = true)]
        config: Option<String>,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Extract {
            #[arg(short, long)]
            input: String,
            #[arg(short, long)]
            gates: String,
            #[arg(short, long)]
            program: String,
        },
        Schedule {
            #[arg(short, long)]
            gates: String,
            #[arg(short, long)]
            solution: String,
            #[arg(short, long)]
            output: Option<String>,
        },
        Encode {
            #[arg(short, long)]
            input: String,
            #[arg(short, long)]
            output: Option<String>,
            #[arg(long)]
            strict_capacity: bool,
            #[arg(long)]
            co_schedule_rotations: bool,
            #[arg(long)]
            readout: bool,
        },
        Compile {
            #[arg(short, long)]
            input: String,
            #[arg(short, long)]
            solution: String,
            #[arg(long)]
            steane: bool,
            #[arg(short, long)]
            output: Option<String>,
        },
        Version,
    }

    #[test]
    fn test_parse_extract() {
        let cli = TestCli::try_parse_from([
            "tweezer", "extract", "-i", "bell.qobj", "-g", "gates.json", "-p", "program.json",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Extract {
                input,
                gates,
                program,
            } => {
                assert_eq!(input, "bell.qobj");
                assert_eq!(gates, "gates.json");
                assert_eq!(program, "program.json");
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_parse_extract_missing_program() {
        let result = TestCli::try_parse_from(["tweezer", "extract", "-i", "a", "-g", "b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_schedule_default_output() {
        let cli = TestCli::try_parse_from([
            "tweezer",
            "schedule",
            "--gates",
            "gates.json",
            "--solution",
            "solver.json",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Schedule {
                gates,
                solution,
                output,
            } => {
                assert_eq!(gates, "gates.json");
                assert_eq!(solution, "solver.json");
                assert!(output.is_none());
            }
            _ => panic!("Expected Schedule command"),
        }
    }

    #[test]
    fn test_parse_encode_flags() {
        let cli = TestCli::try_parse_from([
            "tweezer",
            "encode",
            "-i",
            "scheduled.json",
            "--strict-capacity",
            "--readout",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Encode {
                input,
                output,
                strict_capacity,
                co_schedule_rotations,
                readout,
            } => {
                assert_eq!(input, "scheduled.json");
                assert!(output.is_none());
                assert!(strict_capacity);
                assert!(!co_schedule_rotations);
                assert!(readout);
            }
            _ => panic!("Expected Encode command"),
        }
    }

    #[test]
    fn test_parse_compile_with_steane() {
        let cli = TestCli::try_parse_from([
            "tweezer",
            "compile",
            "-i",
            "bell.qobj",
            "-s",
            "solver.json",
            "--steane",
            "-o",
            "bell_ft.json",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Compile {
                input,
                solution,
                steane,
                output,
            } => {
                assert_eq!(input, "bell.qobj");
                assert_eq!(solution, "solver.json");
                assert!(steane);
                assert_eq!(output.unwrap(), "bell_ft.json");
            }
            _ => panic!("Expected Compile command"),
        }
    }

    #[test]
    fn test_parse_compile_missing_solution() {
        let result = TestCli::try_parse_from(["tweezer", "compile", "-i", "bell.qobj"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli =
            TestCli::try_parse_from(["tweezer", "version", "--config", "tweezer.yaml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("tweezer.yaml"));
        assert!(matches!(cli.command, TestCommands::Version));
    }

    #[test]
    fn test_parse_verbose_vv() {
        let cli = TestCli::try_parse_from(["tweezer", "-vv", "version"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_no_subcommand() {
        let result = TestCli::try_parse_from(["tweezer"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_subcommand() {
        let result = TestCli::try_parse_from(["tweezer", "submit"]);
        assert!(result.is_err());
    }
}
