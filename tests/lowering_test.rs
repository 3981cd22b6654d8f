// Tests for the shape and transport of lowered modules

use lowc::ast::{ArithOp, Expr, Module, NameRef, Stmt};
use lowc::compile;

#[test]
fn test_postfix_increment_side_effect_survives() {
    let source = r#"
        int count(int n) {
            int i = 0;
            while (i < n)
                i++;
            return i;
        }
    "#;

    let module = compile(source).expect("compilation failed");

    let Stmt::FunctionDef { body, .. } = &module.body[0] else {
        panic!("expected function definition");
    };
    let Stmt::While { body: loop_body, .. } = &body[1] else {
        panic!("expected while loop, got {:?}", body[1]);
    };

    // `i++;` must mutate i, not merely evaluate it
    assert_eq!(
        loop_body[0],
        Stmt::Assign {
            target: NameRef::store("i"),
            value: Expr::BinOp {
                op: ArithOp::Add,
                left: Box::new(Expr::Name(NameRef::load("i"))),
                right: Box::new(Expr::Num(lowc::token::Number::Int(1))),
            },
        }
    );
}

#[test]
fn test_compound_assignment_reads_then_writes() {
    let source = r#"
        void f() {
            int x = 1;
            x *= 3;
        }
    "#;

    let module = compile(source).expect("compilation failed");

    let Stmt::FunctionDef { body, .. } = &module.body[0] else {
        panic!("expected function definition");
    };
    let Stmt::Assign { target, value } = &body[1] else {
        panic!("expected assignment, got {:?}", body[1]);
    };

    assert_eq!(target, &NameRef::store("x"));
    let Expr::BinOp {
        op: ArithOp::Mult,
        left,
        ..
    } = value
    else {
        panic!("expected multiplication, got {:?}", value);
    };
    assert_eq!(**left, Expr::Name(NameRef::load("x")));
}

#[test]
fn test_module_round_trips_through_json() {
    let source = r#"
        int fib(int n) {
            if (n < 2)
                return n;
            return fib(n - 1) + fib(n - 2);
        }

        int main() {
            return fib(10);
        }
    "#;

    let module = compile(source).expect("compilation failed");

    let encoded = serde_json::to_string(&module).expect("serialization failed");
    let decoded: Module = serde_json::from_str(&encoded).expect("deserialization failed");

    assert_eq!(module, decoded);
}

#[test]
fn test_string_and_character_literals_lower_alike() {
    let source = r#"
        void f() {
            putc('a');
            puts("hello");
        }
    "#;

    let module = compile(source).expect("compilation failed");

    let Stmt::FunctionDef { body, .. } = &module.body[0] else {
        panic!("expected function definition");
    };

    for (stmt, text) in body.iter().zip(["a", "hello"]) {
        let Stmt::Expr {
            value: Expr::Call { args, .. },
        } = stmt
        else {
            panic!("expected call statement, got {:?}", stmt);
        };
        assert_eq!(args[0], Expr::Str(text.to_string()));
    }
}

#[test]
fn test_declarations_without_initializer_serialize_as_uninit() {
    let module = compile("void f() { int x; }").expect("compilation failed");

    let encoded = serde_json::to_value(&module).expect("serialization failed");
    assert!(
        encoded.to_string().contains("Uninit"),
        "sentinel missing from {}",
        encoded
    );
}
