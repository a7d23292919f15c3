//! Name-resolution tests: every S001 path plus the scoping rules that decide
//! which names a block, loop or function body can see.

#[cfg(test)]
mod tests {
    use crate::analysis::{self, SymbolKind, SymbolTable};
    use crate::error::{Error, ErrorCode};
    use crate::syntax::ast::Node;
    use crate::syntax::lexer::Lexer;
    use crate::syntax::parser::Parser;
    use pretty_assertions::assert_eq;

    // ─── Helpers ─────────────────────────────────────────────────────────────

    fn parse(src: &str) -> Node {
        let tokens = Lexer::new(src).tokenize().expect("lex failed");
        Parser::new(tokens).parse().expect("parse failed")
    }

    fn analyze(src: &str) -> Result<SymbolTable, Error> {
        analysis::analyze(&parse(src))
    }

    fn analyze_ok(src: &str) -> SymbolTable {
        analyze(src).unwrap_or_else(|e| panic!("expected analysis to succeed: {e}"))
    }

    fn analyze_err(src: &str) -> Error {
        match analyze(src) {
            Ok(_) => panic!("expected analysis to fail"),
            Err(e) => e,
        }
    }

    fn assert_undefined(src: &str, name: &str) -> Error {
        let e = analyze_err(src);
        assert_eq!(e.code, ErrorCode::S001);
        assert_eq!(e.message, format!("undefined reference to name '{name}'"));
        e
    }

    // ─── S001: undefined reference ───────────────────────────────────────────

    #[test]
    fn undefined_read() {
        let e = assert_undefined("var x;\nx = y + 1;", "y");
        assert_eq!((e.line, e.column), (2, 5));
    }

    #[test]
    fn undefined_assignment_target() {
        assert_undefined("z = 1;", "z");
    }

    #[test]
    fn undefined_call() {
        let e = assert_undefined("var x;\nx = frob(1);", "frob");
        assert_eq!(e.line, 2);
    }

    #[test]
    fn undefined_in_argument() {
        assert_undefined("println(missing);", "missing");
    }

    #[test]
    fn undefined_in_condition() {
        assert_undefined("if (flag) { 1; }", "flag");
        assert_undefined("while (flag) { 1; }", "flag");
    }

    #[test]
    fn first_undefined_name_wins() {
        assert_undefined("a + b;", "a");
    }

    // ─── Block scoping ───────────────────────────────────────────────────────

    #[test]
    fn if_block_name_is_gone_after_block() {
        assert_undefined("if (1) { var t; t = 1; }\nt;", "t");
    }

    #[test]
    fn else_block_name_is_gone_after_block() {
        assert_undefined("if (0) { 1; } else { var e; e = 2; }\ne;", "e");
    }

    #[test]
    fn then_block_name_not_visible_in_else() {
        assert_undefined("if (1) { var t; t = 1; } else { t; }", "t");
    }

    #[test]
    fn while_block_name_is_gone_after_loop() {
        assert_undefined("while (0) { var w; w = 1; }\nw;", "w");
    }

    #[test]
    fn outer_names_visible_in_blocks() {
        analyze_ok("var x; x = 1; if (x) { x = x + 1; while (x < 10) { x = x * 2; } }");
    }

    #[test]
    fn definition_after_use_in_same_scope_fails() {
        assert_undefined("x = 1; var x;", "x");
    }

    // ─── Functions ───────────────────────────────────────────────────────────

    #[test]
    fn params_visible_in_body_only() {
        analyze_ok("function add(a, b) { a + b; }");
        assert_undefined("function add(a, b) { a + b; }\na;", "a");
    }

    #[test]
    fn function_can_recurse() {
        analyze_ok("function f(n) { if (n > 0) { f(n - 1); } else { 0; } }");
    }

    #[test]
    fn function_locals_do_not_leak() {
        assert_undefined("function f() { var inner; inner = 1; }\ninner;", "inner");
    }

    #[test]
    fn body_sees_enclosing_names() {
        analyze_ok("var base; base = 10; function f(k) { base + k; } f(2);");
    }

    #[test]
    fn nested_function_is_local() {
        analyze_ok("function outer() { function inner() { 1; } inner(); }");
        assert_undefined("function outer() { function inner() { 1; } 0; }\ninner();", "inner");
    }

    #[test]
    fn call_before_definition_fails() {
        assert_undefined("f();\nfunction f() { 1; }", "f");
    }

    #[test]
    fn mutual_recursion_is_rejected() {
        let e = assert_undefined("function a() { b(); }\nfunction b() { a(); }", "b");
        assert_eq!((e.line, e.column), (1, 16));
    }

    #[test]
    fn global_declared_later_is_not_visible() {
        assert_undefined("function f() { later; }\nvar later;", "later");
    }

    // ─── Intrinsics and symbols ──────────────────────────────────────────────

    #[test]
    fn intrinsics_are_predeclared() {
        analyze_ok("var n; n = readint(); print(n); println(\"done\");");
    }

    #[test]
    fn intrinsic_can_be_shadowed() {
        analyze_ok("var print; print = 3; print + 1;");
    }

    #[test]
    fn global_symbols_in_declaration_order() {
        let table = analyze_ok("var b; function f(p) { var local; 1; } var a;");
        let globals: Vec<(&str, SymbolKind)> = table.global_symbols().iter()
            .map(|s| (s.name.as_str(), s.kind))
            .collect();
        assert_eq!(globals, vec![
            ("print", SymbolKind::Intrinsic),
            ("println", SymbolKind::Intrinsic),
            ("readint", SymbolKind::Intrinsic),
            ("b", SymbolKind::Variable),
            ("f", SymbolKind::Function),
            ("a", SymbolKind::Variable),
        ]);
    }

    #[test]
    fn analysis_leaves_tree_untouched() {
        let root = parse("var x; x = 1 + 2; if (x) { println(x); }");
        let before = root.clone();
        analysis::analyze(&root).expect("analysis failed");
        assert_eq!(root, before);
    }
}
