//! Console tests: wire acknowledgements, debug channel, registration phase

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::MemoryIo;
use rust_at_commands::{
    Acknowledgement, CommandError, CommandKind, Config, Console, Grammar, GrammarError, LogLevel,
    ParameterType, TypedValue,
};

/// The demo command set: INFO (Read), TESTS (Write), SENSORS (Run)
fn demo_console() -> (Console<MemoryIo>, Rc<RefCell<Vec<Vec<TypedValue>>>>, Rc<RefCell<u32>>) {
    let writes = Rc::new(RefCell::new(Vec::new()));
    let runs = Rc::new(RefCell::new(0u32));

    let mut console = Console::with_defaults(MemoryIo::new());
    console.register_command("INFO", CommandKind::Read).unwrap();
    console.register_command("TESTS", CommandKind::Write).unwrap();
    console.register_command("SENSORS", CommandKind::Run).unwrap();
    console.add_parameter("TESTS", "P1", ParameterType::String).unwrap();
    console.add_parameter("TESTS", "P2", ParameterType::Integer).unwrap();
    console.add_parameter("TESTS", "P3", ParameterType::Float).unwrap();

    let sink = Rc::clone(&writes);
    console
        .set_write_callback("TESTS", move |values| sink.borrow_mut().push(values.to_vec()))
        .unwrap();
    let counter = Rc::clone(&runs);
    console
        .set_run_callback("SENSORS", move || *counter.borrow_mut() += 1)
        .unwrap();

    (console, writes, runs)
}

#[test]
fn test_write_acknowledged_ok() {
    let (mut console, writes, _) = demo_console();

    let ack = console.dispatch(b"AT+TESTS=hello,42,3.5");

    assert_eq!(ack, Acknowledgement::Ok);
    assert_eq!(console.io().wire_str(), "OK\n");
    assert_eq!(writes.borrow().len(), 1);
    assert_eq!(
        writes.borrow()[0],
        vec![
            TypedValue::String("hello".to_string()),
            TypedValue::Integer(42),
            TypedValue::Float(3.5),
        ]
    );
}

#[test]
fn test_run_acknowledged_ok() {
    let (mut console, _, runs) = demo_console();

    assert!(console.dispatch(b"AT+SENSORS").is_positive());
    assert_eq!(*runs.borrow(), 1);
    assert_eq!(console.io().wire_str(), "OK\n");
}

#[test]
fn test_read_without_callback_still_ok() {
    let (mut console, _, _) = demo_console();

    assert_eq!(console.dispatch(b"AT+INFO?"), Acknowledgement::Ok);
    assert_eq!(console.io().wire_str(), "OK\n");
    assert!(console.io().debug_contains("[WARN] INFO: E08: no callback registered"));
}

#[test]
fn test_type_error_answers_error() {
    let (mut console, writes, _) = demo_console();

    let ack = console.dispatch(b"AT+TESTS=hello,abc,3.5");

    assert_eq!(
        ack.error(),
        Some(&CommandError::TypeError {
            parameter: "P2".to_string()
        })
    );
    assert_eq!(console.io().wire_str(), "ERROR\n");
    assert!(console.io().debug_contains("E05"));
    assert!(console.io().debug_contains("(P2)"));
    assert!(writes.borrow().is_empty());
}

#[test]
fn test_arity_mismatch_answers_error() {
    let (mut console, writes, _) = demo_console();

    let ack = console.dispatch(b"AT+TESTS=hello");

    assert!(matches!(
        ack,
        Acknowledgement::Error(CommandError::ArityMismatch { expected: 3, found: 1 })
    ));
    assert_eq!(console.io().wire_str(), "ERROR\n");
    assert!(writes.borrow().is_empty());
}

#[test]
fn test_verbose_errors_append_code() {
    let config = Config {
        verbose_errors: true,
        ..Config::default()
    };
    let mut console = Console::new(MemoryIo::new(), config).unwrap();

    console.dispatch(b"AT+NOPE?");

    assert_eq!(console.io().wire_str(), "ERROR E02\n");
}

#[test]
fn test_poll_without_input_does_nothing() {
    let (mut console, _, _) = demo_console();

    assert_eq!(console.poll(), None);
    assert!(console.io().wire.is_empty());
}

#[test]
fn test_poll_handles_one_line_per_call() {
    let (mut console, _, runs) = demo_console();
    console.io_mut().feed(b"AT+SENSORS\r\nAT+BOGUS\n");

    assert_eq!(console.poll(), Some(Acknowledgement::Ok));
    assert_eq!(*runs.borrow(), 1);
    assert_eq!(console.io().wire_str(), "OK\n");

    assert_eq!(
        console.poll(),
        Some(Acknowledgement::Error(CommandError::UnknownCommand))
    );
    assert_eq!(console.io().wire_str(), "OK\nERROR\n");

    assert_eq!(console.poll(), None);
}

#[test]
fn test_poll_waits_for_terminator() {
    let (mut console, _, runs) = demo_console();

    console.io_mut().feed(b"AT+SEN");
    assert_eq!(console.poll(), None);

    console.io_mut().feed(b"SORS\n");
    assert_eq!(console.poll(), Some(Acknowledgement::Ok));
    assert_eq!(*runs.borrow(), 1);
}

#[test]
fn test_poll_ignores_blank_lines() {
    let (mut console, _, _) = demo_console();
    console.io_mut().feed(b"\r\n\n");

    assert_eq!(console.poll(), None);
    assert_eq!(console.poll(), None);
    assert!(console.io().wire.is_empty());
}

#[test]
fn test_poll_full_length_line_with_crlf() {
    let mut console = Console::with_defaults(MemoryIo::new());
    let name = "N".repeat(Grammar::DEFAULT.max_line_len - "AT+".len());
    console.register_command(&name, CommandKind::Run).unwrap();

    let mut line = format!("AT+{}", name).into_bytes();
    assert_eq!(line.len(), Grammar::DEFAULT.max_line_len);
    line.extend_from_slice(b"\n");
    console.io_mut().feed(&line);
    line.truncate(Grammar::DEFAULT.max_line_len);
    line.extend_from_slice(b"\r\n");
    console.io_mut().feed(&line);

    assert_eq!(console.poll(), Some(Acknowledgement::Ok));
    assert_eq!(console.poll(), Some(Acknowledgement::Ok));
    assert_eq!(console.io().wire_str(), "OK\nOK\n");
}

#[test]
fn test_poll_overlong_line_discarded() {
    let (mut console, _, runs) = demo_console();
    let mut line = b"AT+SENSORS".to_vec();
    line.extend(std::iter::repeat(b'X').take(300));
    line.push(b'\n');
    line.extend_from_slice(b"AT+SENSORS\n");
    console.io_mut().feed(&line);

    assert_eq!(
        console.poll(),
        Some(Acknowledgement::Error(CommandError::LineTooLong))
    );
    assert_eq!(*runs.borrow(), 0);

    // Next line is unaffected
    assert_eq!(console.poll(), Some(Acknowledgement::Ok));
    assert_eq!(*runs.borrow(), 1);
    assert_eq!(console.io().wire_str(), "ERROR\nOK\n");
}

#[test]
fn test_registration_errors_reported_not_fatal() {
    let (mut console, _, _) = demo_console();

    assert_eq!(
        console.register_command("INFO", CommandKind::Read),
        Err(CommandError::DuplicateCommand)
    );
    assert_eq!(
        console.add_parameter("SENSORS", "P1", ParameterType::Integer),
        Err(CommandError::WrongCommandKind)
    );
    assert_eq!(
        console.set_read_callback("MISSING", || {}),
        Err(CommandError::UnknownCommand)
    );

    let debug = &console.io().debug;
    assert!(debug.contains("[ERROR] Cannot register INFO: E01: duplicate command"));
    assert!(debug.contains("[ERROR] Cannot add parameter to SENSORS: E03"));
    assert!(debug.contains("[ERROR] Cannot set callback on MISSING: E02"));
    assert_eq!(console.registry().len(), 3);
}

#[test]
fn test_unreachable_names_rejected() {
    let mut console = Console::with_defaults(MemoryIo::new());

    assert_eq!(
        console.register_command("A=B", CommandKind::Write),
        Err(CommandError::InvalidName)
    );
    assert_eq!(
        console.register_command("X?", CommandKind::Read),
        Err(CommandError::InvalidName)
    );
    assert_eq!(
        console.register_command("TEMP°", CommandKind::Run),
        Err(CommandError::InvalidName)
    );
    assert_eq!(
        console.register_command("", CommandKind::Run),
        Err(CommandError::EmptyName)
    );

    assert!(console.registry().is_empty());
    assert!(console
        .io()
        .debug_contains("[ERROR] Cannot register X?: E12: invalid command name"));
}

#[test]
fn test_registration_logs_decimal_index() {
    let mut console = Console::with_defaults(MemoryIo::new());

    for i in 0..12 {
        console
            .register_command(&format!("CMD{}", i), CommandKind::Run)
            .unwrap();
    }

    assert!(console
        .io()
        .debug_contains("[INFO] Command CMD11 (RUN) registered at commands[11]"));
}

#[test]
fn test_registration_refused_after_dispatch_starts() {
    let (mut console, _, _) = demo_console();

    console.poll();
    assert!(console.is_sealed());

    assert_eq!(
        console.register_command("LATE", CommandKind::Run),
        Err(CommandError::RegistrySealed)
    );
    assert!(console.registry().find("LATE", CommandKind::Run).is_none());
    assert!(console.io().debug_contains("E11"));
}

#[test]
fn test_duplicate_parameter_name_warns() {
    let mut console = Console::with_defaults(MemoryIo::new());
    console.register_command("PAIR", CommandKind::Write).unwrap();
    console.add_parameter("PAIR", "X", ParameterType::Integer).unwrap();
    console.add_parameter("PAIR", "X", ParameterType::Integer).unwrap();

    assert!(console.io().debug_contains("[WARN] Parameter X declared twice on PAIR"));
    assert_eq!(
        console
            .registry()
            .find("PAIR", CommandKind::Write)
            .unwrap()
            .parameters()
            .len(),
        2
    );
}

#[test]
fn test_debug_command_renders_every_kind() {
    let (mut console, _, _) = demo_console();
    console.register_command("INFO", CommandKind::Run).unwrap();

    console.debug_command("INFO");
    console.debug_command("TESTS");

    let debug = &console.io().debug;
    assert!(debug.contains("[INFO] INFO -> AT+INFO?\n"));
    assert!(debug.contains("[INFO] INFO -> AT+INFO\n"));
    assert!(debug.contains("[INFO] TESTS -> AT+TESTS=<P1:STRING>,<P2:INTEGER>,<P3:FLOAT>\n"));
}

#[test]
fn test_describe_is_stable() {
    let (console, _, _) = demo_console();

    let first = console.describe("TESTS", CommandKind::Write);
    let second = console.describe("TESTS", CommandKind::Write);

    assert_eq!(first.as_deref(), Some("AT+TESTS=<P1:STRING>,<P2:INTEGER>,<P3:FLOAT>"));
    assert_eq!(first, second);
    assert_eq!(console.describe("TESTS", CommandKind::Read), None);
}

#[test]
fn test_log_level_filters_debug_channel() {
    let config = Config {
        log_level: LogLevel::Error,
        ..Config::default()
    };
    let mut console = Console::new(MemoryIo::new(), config).unwrap();
    console.register_command("INFO", CommandKind::Read).unwrap();
    console.register_command("INFO", CommandKind::Read).ok();

    assert!(!console.io().debug_contains("[INFO]"));
    assert!(console.io().debug_contains("[ERROR]"));
}

#[test]
fn test_invalid_grammar_rejected() {
    let config = Config {
        grammar: Grammar {
            subcommand_read: '=',
            ..Grammar::DEFAULT
        },
        ..Config::default()
    };

    assert_eq!(
        Console::new(MemoryIo::new(), config).err(),
        Some(GrammarError::Collision('='))
    );
}

#[test]
fn test_custom_terminator_on_wire() {
    let config = Config {
        grammar: Grammar {
            terminator: b'\r',
            ..Grammar::DEFAULT
        },
        ..Config::default()
    };
    let mut console = Console::new(MemoryIo::new(), config).unwrap();
    console.register_command("PING", CommandKind::Run).unwrap();
    console.io_mut().feed(b"AT+PING\r");

    assert_eq!(console.poll(), Some(Acknowledgement::Ok));
    assert_eq!(console.io().wire_str(), "OK\r");
}
