#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;
    use scc::compile_to_asm;
    use scc::compiler::{CompiledProgram, CompilerPipeline};
    use scc_ast::build::*;
    use scc_ast::AstNode;
    use scc_ctx::{CompilerConfig, CompilerConfigBuilder};
    use scc_errors::{Diagnostic, ErrCode, ErrorKind};
    use scc_symbol::SymbolKind;

    fn compile(mut nodes: Vec<AstNode>) -> Result<CompiledProgram, Diagnostic> {
        let _ = env_logger::builder().is_test(true).try_init();
        CompilerPipeline::new(CompilerConfig::default()).compile(&mut nodes)
    }

    fn lines(program: &CompiledProgram) -> Vec<String> {
        program.instrs.iter().map(|i| i.to_string().trim().to_string()).collect()
    }

    fn contains_run(lines: &[String], run: &[&str]) -> bool {
        lines.windows(run.len()).any(|w| w.iter().zip(run).all(|(a, b)| a == b))
    }

    fn main_fn(decls: Vec<scc_ast::VarDeclStmt>, stmts: Vec<scc_ast::Stmt>) -> AstNode {
        func_def(BaseTy::Int, "main", vec![], block(decls, stmts))
    }

    #[test]
    fn test_store_print_return_program() {
        // int x; int main(){ x = 3; print(x); return 0; }
        let program = compile(vec![
            global(vec![scalar("x")]),
            main_fn(vec![], vec![
                expr_stmt(assign(ident("x"), num(3))),
                expr_stmt(call("print", vec![ident("x")])),
                ret(Some(num(0))),
            ]),
        ])
        .expect("program compiles");
        let out = lines(&program);

        assert!(program.warnings.is_empty());
        assert!(contains_run(&out, &["li $t0,3", "la $t1,x", "sw $t0,0($t1)"]));
        assert!(contains_run(&out, &["move $a0,$t0", "syscall", "li $v0,4", "la $a0,_newline", "syscall"]));
        assert!(contains_run(&out, &["li $t0,0"]));
        assert!(out.iter().any(|l| l.starts_with("lw $v0,")));
        assert!(contains_run(&out, &["x:", ".word 0"]));
        assert_eq!(out.iter().filter(|l| *l == "main:").count(), 1);
    }

    #[test]
    fn test_pointer_program_loads_through_pointer() {
        // int main(){ int *p; int y; y = 5; p = &y; print(*p); return 0; }
        let program = compile(vec![main_fn(
            vec![var_decl(vec![pointer("p")]), var_decl(vec![scalar("y")])],
            vec![
                expr_stmt(assign(ident("y"), num(5))),
                expr_stmt(assign(ident("p"), addr(ident("y")))),
                expr_stmt(call("print", vec![deref(ident("p"))])),
                ret(Some(num(0))),
            ],
        )])
        .expect("program compiles");
        let out = lines(&program);

        // p at 0($fp), y at -4($fp)
        assert!(contains_run(&out, &["addiu $t0,$fp,-4", "sw $t0,0($fp)"]));
        assert!(out.iter().any(|l| l == "lw $t0,0($t0)"));
        assert!(!out.iter().any(|l| l.starts_with("jal")));
    }

    #[rstest]
    #[case(vec![num(1)], ErrCode::TYP4002)]
    #[case(vec![num(1), num(2), num(3)], ErrCode::TYP4002)]
    #[case(vec![num(1), ident("buf")], ErrCode::TYP4003)]
    fn test_bad_calls_fail_before_codegen(#[case] args: Vec<scc_ast::Expr>, #[case] code: ErrCode) {
        let err = compile(vec![
            func_def(
                BaseTy::Int,
                "add2",
                vec![param("a"), param("b")],
                block(vec![], vec![ret(Some(add(ident("a"), ident("b"))))]),
            ),
            main_fn(vec![var_decl(vec![array("buf", 2)])], vec![expr_stmt(call("add2", args)), ret(Some(num(0)))]),
        ])
        .expect_err("ill-typed call");
        assert_eq!((err.kind, err.code), (ErrorKind::TypeError, code));
    }

    #[test]
    fn test_missing_main_is_reported_last() {
        let err = compile(vec![func_def(BaseTy::Void, "helper", vec![], block(vec![], vec![]))])
            .expect_err("no main");
        assert_eq!(err.kind, ErrorKind::StructuralError);
        assert_eq!(err.to_string(), "structural error[STR5000]: no definition of 'main' found");
    }

    #[test]
    fn test_type_error_wins_over_missing_main() {
        let err = compile(vec![func_def(
            BaseTy::Void,
            "helper",
            vec![],
            block(vec![], vec![ret(Some(num(1)))]),
        )])
        .expect_err("bad return");
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_name_error_carries_position() {
        let err = compile(vec![main_fn(vec![], vec![expr_stmt(ident("ghost").at(3, 5))])])
            .expect_err("undefined name");
        assert_eq!(err.to_string(), "3:5: name error[SEM2000]: 'ghost' is not defined");
    }

    fn shadowing_program() -> Vec<AstNode> {
        vec![
            func_def(
                BaseTy::Int,
                "f",
                vec![param("n")],
                block(vec![var_decl(vec![scalar("n").at(2, 9)])], vec![
                    expr_stmt(assign(ident("n"), num(1))),
                    ret(Some(ident("n"))),
                ]),
            ),
            main_fn(vec![], vec![ret(Some(call("f", vec![num(5)])))]),
        ]
    }

    #[test]
    fn test_shadowed_parameter_is_a_warning() {
        let program = compile(shadowing_program()).expect("warnings are not fatal");
        assert_eq!(program.warnings.len(), 1);
        assert_eq!(program.warnings[0].code, ErrCode::SEM2004);
        assert!(program.warnings[0].to_string().starts_with("2:9: warning[SEM2004]"));
    }

    #[test]
    fn test_warnings_as_errors() {
        let config = CompilerConfigBuilder::new().warnings_as_errors(true).build();
        let mut nodes = shadowing_program();
        let err = compile_to_asm(&mut nodes, config).expect_err("warning promoted");
        assert_eq!((err.code, err.is_error()), (ErrCode::SEM2004, true));
    }

    #[test]
    fn test_frame_storage_is_never_shared() {
        let mut nodes = vec![main_fn(
            vec![var_decl(vec![scalar("i"), array("a", 3)])],
            vec![
                if_stmt(
                    lt(ident("i"), num(2)),
                    compound(vec![var_decl(vec![scalar("x")])], vec![expr_stmt(assign(ident("x"), add(ident("i"), num(1))))]),
                    Some(compound(vec![var_decl(vec![scalar("y")])], vec![expr_stmt(assign(ident("y"), num(0)))])),
                ),
                while_stmt(
                    and(lt(ident("i"), num(10)), eq(ident("i"), ident("i"))),
                    compound(vec![var_decl(vec![pointer("q")])], vec![expr_stmt(assign(ident("q"), add(ident("a"), ident("i"))))]),
                ),
                ret(Some(num(0))),
            ],
        )];
        let _ = env_logger::builder().is_test(true).try_init();
        let mut pipeline = CompilerPipeline::new(CompilerConfig::default());
        let program = pipeline.compile(&mut nodes).expect("program compiles");

        let ctx = pipeline.ctx.borrow();
        let mut words = HashSet::new();
        for (_, sym) in ctx.symbols.iter() {
            if sym.is_global() || sym.kind == SymbolKind::Function {
                continue;
            }
            let base = sym.offset.expect("every local has an offset");
            let len = sym.ty.storage_size().expect("bounded size") as i32 / 4;
            for w in 0..len {
                assert!(words.insert(base + 4 * w), "'{}' overlaps another declaration", sym.name);
            }
        }

        // prologue: addiu $fp,$sp,localSize+4
        let out = lines(&program);
        let fp_setup = out.iter().find(|l| l.starts_with("addiu $fp,$sp,")).expect("prologue");
        let local_size: usize = fp_setup.trim_start_matches("addiu $fp,$sp,").parse::<usize>().expect("immediate") - 4;
        assert_eq!(words.len() * 4, local_size);
    }

    #[test]
    fn test_pointer_arithmetic_scales_by_word() {
        let program = compile(vec![main_fn(
            vec![var_decl(vec![array("a", 4), pointer("p")])],
            vec![
                expr_stmt(assign(ident("p"), add(ident("a"), num(2)))),
                expr_stmt(assign(deref(ident("p")), num(7))),
                ret(Some(deref(sub(ident("p"), num(1))))),
            ],
        )])
        .expect("program compiles");
        let out = lines(&program);
        assert_eq!(out.iter().filter(|l| *l == "li $t0,4").count(), 2);
        assert_eq!(out.iter().filter(|l| *l == "mul $t0,$t0,$t1").count(), 2);
        assert!(out.iter().any(|l| l == "sw $t0,0($t1)"));
    }

    #[test]
    fn test_recursive_program() {
        // int fact(int n){ if (n < 2) return 1; return n * fact(n - 1); }
        let program = compile(vec![
            proto(BaseTy::Int, "fact", vec![param("n")]),
            main_fn(vec![], vec![expr_stmt(call("print", vec![call("fact", vec![num(5)])])), ret(Some(num(0)))]),
            func_def(
                BaseTy::Int,
                "fact",
                vec![param("n")],
                block(vec![], vec![
                    if_stmt(lt(ident("n"), num(2)), ret(Some(num(1))), None),
                    ret(Some(mul(ident("n"), call("fact", vec![sub(ident("n"), num(1))])))),
                ]),
            ),
        ])
        .expect("program compiles");
        let out = lines(&program);

        assert_eq!(out.iter().filter(|l| *l == "jal fact").count(), 2);
        assert!(out.iter().any(|l| l == "lw $t0,4($fp)"));

        let labels: Vec<&String> = out.iter().filter(|l| l.ends_with(':')).collect();
        let unique: HashSet<&&String> = labels.iter().collect();
        assert_eq!(labels.len(), unique.len());
    }

    #[test]
    fn test_global_named_like_generated_label_is_rejected() {
        // int _L0; int main(){ if (1) _L0 = 1; return 0; }
        let err = compile(vec![
            global(vec![scalar("_L0").at(1, 5)]),
            main_fn(vec![], vec![
                if_stmt(num(1), expr_stmt(assign(ident("_L0"), num(1))), None),
                ret(Some(num(0))),
            ]),
        ])
        .expect_err("label clash");
        assert_eq!(err.to_string(), "1:5: name error[SEM2005]: '_L0' is reserved for generated labels");
    }

    #[test]
    fn test_emitted_labels_stay_unique_with_custom_prefix() {
        let config = CompilerConfigBuilder::new().label_prefix("skip").build();
        let mut nodes = vec![
            global(vec![scalar("_L0")]),
            main_fn(vec![], vec![
                if_stmt(num(1), expr_stmt(assign(ident("_L0"), num(1))), None),
                ret(Some(num(0))),
            ]),
        ];
        let asm = compile_to_asm(&mut nodes, config).expect("program compiles");
        let labels: Vec<&str> = asm.lines().filter(|l| l.ends_with(':')).collect();
        let unique: HashSet<&&str> = labels.iter().collect();
        assert_eq!(labels, vec!["main:", "skip0:", "skip1:", "_newline:", "_L0:"]);
        assert_eq!(labels.len(), unique.len());
    }

    #[test]
    fn test_huge_local_array_is_reported_not_fatal() {
        let err = compile(vec![main_fn(vec![var_decl(vec![array("big", 600_000_000)])], vec![ret(Some(num(0)))])])
            .expect_err("array too large");
        assert_eq!((err.kind, err.code), (ErrorKind::TypeError, ErrCode::TYP4010));
    }

    #[test]
    fn test_oversized_frame_is_reported_not_fatal() {
        let err = compile(vec![main_fn(
            vec![var_decl(vec![array("a", 300_000_000), array("b", 300_000_000)])],
            vec![ret(Some(num(0)))],
        )])
        .expect_err("frame too large");
        assert_eq!((err.kind, err.code), (ErrorKind::StructuralError, ErrCode::STR5001));
    }

    #[test]
    fn test_compile_to_asm_renders_text() {
        let mut nodes = vec![global(vec![array("grid", 2)]), main_fn(vec![], vec![ret(None)])];
        // int main with bare return is rejected
        assert!(compile_to_asm(&mut nodes, CompilerConfig::default()).is_err());

        let mut nodes = vec![
            global(vec![array("grid", 2)]),
            func_def(BaseTy::Void, "main", vec![], block(vec![], vec![empty(), ret(None)])),
        ];
        let asm = compile_to_asm(&mut nodes, CompilerConfig::default()).expect("program compiles");
        assert!(asm.starts_with("\t.text\n\t.globl main\nmain:\n"));
        assert!(asm.contains("\tnop\n"));
        assert!(asm.ends_with("grid:\n\t.word 0:2\n"));
    }
}
