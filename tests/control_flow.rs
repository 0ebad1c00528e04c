use loxwalk::run_capturing;

#[test]
fn if_else_picks_the_right_branch() {
    let source = r#"
        if (true) print "yes"; else print "no";
        if (false) print "yes"; else print "no";
    "#;
    let (output, ..) = run_capturing(source);
    assert_eq!(output, "yes\nno\n");
}

#[test]
fn if_without_else_is_allowed() {
    let (output, ..) = run_capturing("if (false) print \"unreached\"; print \"done\";");
    assert_eq!(output, "done\n");
}

#[test]
fn dangling_else_binds_to_nearest_if() {
    let source = r#"
        if (true) if (false) print "a"; else print "b";
    "#;
    let (output, ..) = run_capturing(source);
    assert_eq!(output, "b\n");
}

#[test]
fn while_loop_counts_up() {
    let source = r#"
        var i = 0;
        while (i < 3) {
            print i;
            i = i + 1;
        }
    "#;
    let (output, ..) = run_capturing(source);
    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn for_loop_desugars_with_initializer_condition_and_increment() {
    let source = r#"
        for (var i = 0; i < 3; i = i + 1) {
            print i;
        }
    "#;
    let (output, ..) = run_capturing(source);
    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn for_loop_with_omitted_initializer_and_increment() {
    let source = r#"
        var i = 0;
        for (; i < 3;) {
            print i;
            i = i + 1;
        }
    "#;
    let (output, ..) = run_capturing(source);
    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn for_loop_variable_is_scoped_to_the_loop() {
    let source = r#"
        for (var i = 0; i < 1; i = i + 1) {}
        print i;
    "#;
    // `i` falls out of scope with the loop's block, so the reference at top
    // level resolves as global (no side-table entry) and fails at runtime
    // rather than at resolve time.
    let (_, had_error, had_runtime_error) = run_capturing(source);
    assert!(!had_error);
    assert!(had_runtime_error);
}
