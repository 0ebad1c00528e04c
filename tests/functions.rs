use loxwalk::run_capturing;

#[test]
fn function_declaration_and_call() {
    let source = r#"
        fun add(a, b) {
            return a + b;
        }
        print add(1, 2);
    "#;
    let (output, ..) = run_capturing(source);
    assert_eq!(output, "3\n");
}

#[test]
fn function_without_explicit_return_yields_nil() {
    let source = r#"
        fun doNothing() {}
        print doNothing();
    "#;
    let (output, ..) = run_capturing(source);
    assert_eq!(output, "nil\n");
}

#[test]
fn bare_return_yields_nil() {
    let source = r#"
        fun early() {
            return;
            print "unreached";
        }
        print early();
    "#;
    let (output, ..) = run_capturing(source);
    assert_eq!(output, "nil\n");
}

#[test]
fn recursive_function_computes_fibonacci() {
    let source = r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(10);
    "#;
    let (output, ..) = run_capturing(source);
    assert_eq!(output, "55\n");
}

#[test]
fn calling_with_wrong_arity_is_a_runtime_error() {
    let source = r#"
        fun add(a, b) { return a + b; }
        add(1);
    "#;
    let (_, _, had_runtime_error) = run_capturing(source);
    assert!(had_runtime_error);
}

#[test]
fn calling_a_non_callable_value_is_a_runtime_error() {
    let (_, _, had_runtime_error) = run_capturing("var a = 1; a();");
    assert!(had_runtime_error);
}

#[test]
fn returning_from_top_level_code_is_a_resolve_error() {
    let (_, had_error, _) = run_capturing("return 1;");
    assert!(had_error);
}

#[test]
fn clock_native_function_is_callable_with_no_arguments() {
    let source = r#"
        var t = clock();
        print t >= 0;
    "#;
    let (output, had_error, had_runtime_error) = run_capturing(source);
    assert_eq!(output, "true\n");
    assert!(!had_error);
    assert!(!had_runtime_error);
}

#[test]
fn functions_are_first_class_values() {
    let source = r#"
        fun add(a, b) { return a + b; }
        var op = add;
        print op(2, 3);
    "#;
    let (output, ..) = run_capturing(source);
    assert_eq!(output, "5\n");
}
