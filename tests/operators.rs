use loxwalk::run_capturing;

#[test]
fn arithmetic_precedence_and_grouping() {
    let (output, ..) = run_capturing("print 1 + 2 * 3 - (4 - 1);");
    assert_eq!(output, "4\n");
}

#[test]
fn division_by_zero_produces_infinity_not_an_error() {
    let (output, had_error, had_runtime_error) = run_capturing("print 1 / 0;");
    assert_eq!(output, "inf\n");
    assert!(!had_error);
    assert!(!had_runtime_error);
}

#[test]
fn plus_concatenates_strings() {
    let (output, ..) = run_capturing(r#"print "foo" + "bar";"#);
    assert_eq!(output, "foobar\n");
}

#[test]
fn plus_rejects_mixed_operand_types() {
    let (_, _, had_runtime_error) = run_capturing(r#"print "foo" + 1;"#);
    assert!(had_runtime_error);
}

#[test]
fn comparison_requires_numbers() {
    let (_, _, had_runtime_error) = run_capturing(r#"print "foo" < 1;"#);
    assert!(had_runtime_error);
}

#[test]
fn equality_never_coerces_between_types() {
    let (output, ..) = run_capturing(r#"print 1 == "1"; print nil == false;"#);
    assert_eq!(output, "false\nfalse\n");
}

#[test]
fn falsey_values_are_nil_and_false_only() {
    let (output, ..) = run_capturing("print !nil; print !false; print !0; print !\"\";");
    assert_eq!(output, "true\ntrue\nfalse\nfalse\n");
}

#[test]
fn logical_and_returns_the_deciding_operand() {
    let (output, ..) = run_capturing(r#"print false and "unreached"; print 1 and 2;"#);
    assert_eq!(output, "false\n2\n");
}

#[test]
fn logical_or_returns_the_deciding_operand() {
    let (output, ..) = run_capturing(r#"print 1 or 2; print false or "fallback";"#);
    assert_eq!(output, "1\nfallback\n");
}

#[test]
fn logical_or_short_circuits_without_evaluating_right_side() {
    let source = r#"
        fun boom() { print "should not print"; return true; }
        print true or boom();
    "#;
    let (output, ..) = run_capturing(source);
    assert_eq!(output, "true\n");
}

#[test]
fn negating_a_non_number_is_a_runtime_error() {
    let (_, _, had_runtime_error) = run_capturing(r#"print -"foo";"#);
    assert!(had_runtime_error);
}

#[test]
fn whole_valued_numbers_print_without_a_decimal_point() {
    let (output, ..) = run_capturing("print 6 * 7;");
    assert_eq!(output, "42\n");
}
