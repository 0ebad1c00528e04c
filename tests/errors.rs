use loxwalk::run_capturing;

#[test]
fn unterminated_string_is_a_scan_error() {
    let (_, had_error, had_runtime_error) = run_capturing("\"unterminated");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn unexpected_character_is_a_scan_error_and_does_not_run_the_program() {
    let (output, had_error, _) = run_capturing("print 1; @ print 2;");
    assert!(had_error);
    assert_eq!(output, "");
}

#[test]
fn missing_semicolon_is_a_parse_error() {
    let (_, had_error, had_runtime_error) = run_capturing("var a = 1");
    assert!(had_error);
    assert!(!had_runtime_error);
}

#[test]
fn invalid_assignment_target_is_a_parse_error() {
    let (_, had_error, _) = run_capturing("1 + 2 = 3;");
    assert!(had_error);
}

#[test]
fn synchronization_lets_parsing_reach_a_second_error_in_one_pass() {
    // Both `var a = ;` and `var;` are malformed declarations; synchronize()
    // recovers at the next statement boundary so the parser reports both
    // instead of bailing out after the first.
    let source = "var a = ; var;";
    let (_, had_error, _) = run_capturing(source);
    assert!(had_error);
}

#[test]
fn compile_time_error_prevents_any_execution() {
    let source = "print \"before\"; var; print \"after\";";
    let (output, had_error, _) = run_capturing(source);
    assert!(had_error);
    assert_eq!(output, "");
}

#[test]
fn runtime_error_aborts_remaining_statements() {
    let source = r#"
        print "before";
        print nope;
        print "after";
    "#;
    let (output, had_error, had_runtime_error) = run_capturing(source);
    assert!(!had_error);
    assert!(had_runtime_error);
    assert_eq!(output, "before\n");
}
