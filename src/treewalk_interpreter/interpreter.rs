use super::environment::Environment;
use super::errors::{EvalResult, RuntimeError, RuntimeResult, Unwind};
use super::function::MonkeyFn;
use super::native_function::lookup_native_func;
use super::object::{Object, NULL};
use crate::frontend::grammar::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::stack::ensure_sufficient_stack;

use std::io::{self, Stdout, Write};
use tracing::{debug, trace};

pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Tree-walking evaluator. The global environment outlives individual
/// programs, so a REPL can keep feeding it lines.
pub struct Interpreter<W: Write = Stdout> {
    env: Environment,
    output: W,
    max_depth: usize,
    depth: usize,
}

impl Interpreter<Stdout> {
    pub fn new() -> Self {
        Interpreter::new_with_output(io::stdout())
    }
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new_with_output(output: W) -> Self {
        Interpreter {
            env: Environment::new(),
            output,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn swap_env(&mut self, mut env: Environment) -> Environment {
        std::mem::swap(&mut self.env, &mut env);
        // The caller restores this once the callee is done.
        env
    }

    /// Evaluates a whole program. A top-level `return` yields its value and a
    /// runtime error comes back as an `Object::Error`.
    pub fn eval_program(&mut self, program: &Program) -> Object {
        match self.eval_statements(&program.statements) {
            Ok(object) | Err(Unwind::Return(object)) => object,
            Err(Unwind::Error(e)) => {
                debug!(error = %e, "program failed");
                Object::Error(e)
            }
        }
    }

    fn eval_statements(&mut self, stmts: &[Statement]) -> EvalResult<Object> {
        let mut result = NULL;
        for stmt in stmts.iter() {
            result = self.eval_statement(stmt)?;
        }
        Ok(result)
    }

    /// Blocks do not open a scope of their own; only function calls do.
    pub fn eval_block(&mut self, block: &BlockStatement) -> EvalResult<Object> {
        self.eval_statements(&block.statements)
    }

    pub fn eval_statement(&mut self, stmt: &Statement) -> EvalResult<Object> {
        match stmt {
            Statement::Let { name, value } => {
                let value = self.eval_expression(value)?;
                self.env.set(name.name.clone(), value);
                Ok(NULL)
            }
            Statement::Return { value } => {
                let value = self.eval_expression(value)?;
                Err(Unwind::Return(value))
            }
            Statement::Expression { expr } => self.eval_expression(expr),
        }
    }

    pub fn eval_expression(&mut self, expr: &Expression) -> EvalResult<Object> {
        ensure_sufficient_stack(|| self.eval_expression_inner(expr))
    }

    fn eval_expression_inner(&mut self, expr: &Expression) -> EvalResult<Object> {
        let object = match expr {
            Expression::IntegerLiteral(n) => Object::Integer(*n),
            Expression::StringLiteral(s) => Object::String(s.clone()),
            Expression::Boolean(b) => Object::from_native_bool(*b),
            Expression::Identifier(ident) => self.lookup(ident)?,
            Expression::Prefix { operator, operand } => {
                let value = self.eval_expression(operand)?;
                Object::apply_prefix_op(*operator, value)?
            }
            Expression::Infix {
                operator,
                left,
                right,
            } => {
                let lhs = self.eval_expression(left)?;
                let rhs = self.eval_expression(right)?;
                Object::apply_infix_op(*operator, lhs, rhs)?
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                return self.eval_if_else(condition, consequence, alternative.as_ref());
            }
            Expression::FunctionLiteral(func_info) => {
                Object::Function(MonkeyFn::new(func_info.clone(), self.env.clone()))
            }
            Expression::Call { callee, args } => self.eval_func_call(callee, args)?,
            Expression::ArrayLiteral(elements) => Object::array(self.eval_expressions(elements)?),
            Expression::Index { collection, index } => {
                let collection = self.eval_expression(collection)?;
                let index = self.eval_expression(index)?;
                Object::index(&collection, &index)?
            }
        };

        Ok(object)
    }

    fn eval_if_else(
        &mut self,
        condition: &Expression,
        consequence: &BlockStatement,
        alternative: Option<&BlockStatement>,
    ) -> EvalResult<Object> {
        if self.eval_expression(condition)?.is_truthy() {
            return self.eval_block(consequence);
        }
        match alternative {
            Some(alternative) => self.eval_block(alternative),
            None => Ok(NULL),
        }
    }

    /// Left to right, stopping at the first failure.
    fn eval_expressions(&mut self, exprs: &[Expression]) -> EvalResult<Vec<Object>> {
        let mut objects = Vec::with_capacity(exprs.len());
        for expr in exprs.iter() {
            objects.push(self.eval_expression(expr)?);
        }
        Ok(objects)
    }

    /// User bindings shadow the built-ins.
    fn lookup(&self, ident: &Identifier) -> RuntimeResult<Object> {
        self.env
            .get(&ident.name)
            .or_else(|| lookup_native_func(&ident.name).map(Object::Builtin))
            .ok_or_else(|| RuntimeError::UndefinedIdentifier(ident.name.clone()))
    }

    fn eval_func_call(&mut self, callee: &Identifier, raw_args: &[Expression]) -> EvalResult<Object> {
        let callee = self.lookup(callee)?;
        let args = self.eval_expressions(raw_args)?;

        Ok(self.call(callee, args)?)
    }

    pub fn call(&mut self, callee: Object, args: Vec<Object>) -> RuntimeResult<Object> {
        match callee {
            Object::Function(func) => {
                if self.depth >= self.max_depth {
                    return Err(RuntimeError::CallDepthExceeded(self.max_depth));
                }

                self.depth += 1;
                trace!(depth = self.depth, arity = func.arity(), "calling function");
                let result = func.execute(args, self);
                self.depth -= 1;

                result
            }
            Object::Builtin(func) => {
                trace!(name = func.name(), "calling builtin");
                func.execute(args, &mut self.output)
            }
            other => Err(RuntimeError::NotCallable(other.object_type())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{Lexer, Parser};
    use crate::treewalk_interpreter::object::{FALSE, TRUE};

    fn parse(source: &str) -> Program {
        match Parser::new(Lexer::new(source)).parse() {
            Ok(program) => program,
            Err(errors) => panic!("{}: unexpected parser errors {:?}", source, errors),
        }
    }

    fn eval_source(source: &str) -> Object {
        let mut interpreter = Interpreter::new_with_output(io::sink());
        interpreter.eval_program(&parse(source))
    }

    fn eval_error(source: &str) -> String {
        match eval_source(source) {
            Object::Error(e) => e.to_string(),
            other => panic!("{}: expected an error, got {:?}", source, other),
        }
    }

    fn assert_evals_to(cases: &[(&str, Object)]) {
        for (source, expected) in cases.iter() {
            assert_eq!(&eval_source(source), expected, "{}", source);
        }
    }

    #[test]
    fn test_integer_expressions() {
        assert_evals_to(&[
            ("5", Object::Integer(5)),
            ("-10", Object::Integer(-10)),
            ("--5", Object::Integer(5)),
            ("5 + 5 + 5 + 5 - 10", Object::Integer(10)),
            ("2 * 2 * 2 * 2 * 2", Object::Integer(32)),
            ("-50 + 100 + -50", Object::Integer(0)),
            ("20 + 2 * -10", Object::Integer(0)),
            ("50 / 2 * 2 + 10", Object::Integer(60)),
            ("2 * (5 + 10)", Object::Integer(30)),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", Object::Integer(50)),
            ("7 / -2", Object::Integer(-3)),
        ]);
    }

    #[test]
    fn test_boolean_expressions() {
        assert_evals_to(&[
            ("true", TRUE),
            ("1 < 2", TRUE),
            ("1 > 2", FALSE),
            ("1 == 1", TRUE),
            ("1 != 1", FALSE),
            ("true == true", TRUE),
            ("true != false", TRUE),
            ("(1 < 2) == true", TRUE),
            ("(1 > 2) == true", FALSE),
            ("\"a\" == \"a\"", TRUE),
            ("\"a\" != \"b\"", TRUE),
            ("1 == true", FALSE),
        ]);
    }

    #[test]
    fn test_bang_operator() {
        assert_evals_to(&[
            ("!true", FALSE),
            ("!false", TRUE),
            ("!5", FALSE),
            ("!0", FALSE),
            ("!!true", TRUE),
            ("!!5", TRUE),
            ("!if (false) { 1 }", TRUE),
        ]);
    }

    #[test]
    fn test_if_else_expressions() {
        assert_evals_to(&[
            ("if (true) { 10 }", Object::Integer(10)),
            ("if (false) { 10 }", NULL),
            ("if (1) { 10 }", Object::Integer(10)),
            ("if (1 < 2) { 10 } else { 20 }", Object::Integer(10)),
            ("if (1 > 2) { 10 } else { 20 }", Object::Integer(20)),
            ("if (1 > 2) { 10 }", NULL),
            ("if (true) { }", NULL),
        ]);
    }

    #[test]
    fn test_return_statements() {
        assert_evals_to(&[
            ("return 10;", Object::Integer(10)),
            ("return 10; 9;", Object::Integer(10)),
            ("9; return 2 * 5; 9;", Object::Integer(10)),
            (
                "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
                Object::Integer(10),
            ),
            (
                "let f = fn(x) { if (x > 1) { return x; } 0 }; f(5) + f(1)",
                Object::Integer(5),
            ),
        ]);
    }

    #[test]
    fn test_let_statements() {
        assert_evals_to(&[
            ("let a = 5; a;", Object::Integer(5)),
            ("let a = 5 * 5; a;", Object::Integer(25)),
            ("let a = 5; let b = a; let c = a + b + 5; c;", Object::Integer(15)),
            ("let a = 5;", NULL),
            ("let a = 1; let a = a + 1; a", Object::Integer(2)),
        ]);
    }

    #[test]
    fn test_blocks_share_enclosing_scope() {
        assert_eq!(
            eval_source("let x = 1; if (true) { let x = 2; }; x"),
            Object::Integer(2)
        );
    }

    #[test]
    fn test_error_handling() {
        let cases = [
            ("5 + true;", "infix operator + works only with integers. Got INTEGER+BOOLEAN"),
            ("5 + true; 5;", "infix operator + works only with integers. Got INTEGER+BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            (
                "if (10 > 1) { true + false; }",
                "infix operator + works only with integers. Got BOOLEAN+BOOLEAN",
            ),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                "infix operator + works only with integers. Got BOOLEAN+BOOLEAN",
            ),
            ("\"a\" - \"b\"", "infix operator - works only with integers. Got STRING-STRING"),
            ("foobar", "identifier not found: foobar"),
            ("let x = 1; x(1)", "not a function: INTEGER"),
            ("1 / 0", "division by zero"),
            ("9223372036854775807 + 1", "integer overflow"),
            ("[1, 2][true]", "index operator not supported: ARRAY[BOOLEAN]"),
            ("1[0]", "index operator not supported: INTEGER[INTEGER]"),
        ];

        for (source, expected) in cases {
            assert_eq!(eval_error(source), expected, "{}", source);
        }
    }

    #[test]
    fn test_error_stops_evaluation() {
        let mut output = vec![];
        let mut interpreter = Interpreter::new_with_output(&mut output);
        let result = interpreter.eval_program(&parse("puts(1); 1 + true; puts(2);"));

        assert!(matches!(result, Object::Error(_)));
        drop(interpreter);
        assert_eq!(output, b"1\n");
    }

    #[test]
    fn test_functions_and_closures() {
        assert_evals_to(&[
            ("let identity = fn(x) { x; }; identity(5);", Object::Integer(5)),
            ("let identity = fn(x) { return x; }; identity(5);", Object::Integer(5)),
            ("let double = fn(x) { x * 2; }; double(5);", Object::Integer(10)),
            ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", Object::Integer(20)),
            ("let noop = fn() { }; noop()", NULL),
            (
                "let new_adder = fn(x) { fn(y) { x + y } }; let add_two = new_adder(2); add_two(3)",
                Object::Integer(5),
            ),
            (
                "let x = 10; let f = fn() { x }; let g = fn(x) { f() }; g(1)",
                Object::Integer(10),
            ),
            (
                "let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } }; fib(15)",
                Object::Integer(610),
            ),
        ]);

        assert_eq!(
            eval_source("fn(x) { x + 1 }").to_string(),
            "fn(x) { (x + 1) }"
        );
    }

    #[test]
    fn test_arity_mismatch() {
        assert_eq!(
            eval_error("let f = fn(x) { x }; f(1, 2)"),
            "wrong number of arguments. got=2, want=1"
        );
        assert_eq!(
            eval_error("let f = fn(x, y) { x }; f()"),
            "wrong number of arguments. got=0, want=2"
        );
    }

    #[test]
    fn test_arguments_short_circuit() {
        let mut output = vec![];
        let mut interpreter = Interpreter::new_with_output(&mut output);

        let result = interpreter.eval_program(&parse("len(missing, puts(1))"));
        assert_eq!(result, Object::Error(RuntimeError::UndefinedIdentifier("missing".to_owned())));

        let result = interpreter.eval_program(&parse("[1, missing, puts(2)]"));
        assert_eq!(result, Object::Error(RuntimeError::UndefinedIdentifier("missing".to_owned())));

        let result = interpreter.eval_program(&parse("missing(puts(3))"));
        assert_eq!(result, Object::Error(RuntimeError::UndefinedIdentifier("missing".to_owned())));

        drop(interpreter);
        assert!(output.is_empty());
    }

    #[test]
    fn test_arrays() {
        assert_evals_to(&[
            (
                "[1, 2 * 2, 3 + 3]",
                Object::array(vec![Object::Integer(1), Object::Integer(4), Object::Integer(6)]),
            ),
            ("[1, 2, 3][0]", Object::Integer(1)),
            ("[1, 2, 3][1 + 1]", Object::Integer(3)),
            ("let i = 0; [1][i];", Object::Integer(1)),
            ("let a = [1, 2, 3]; a[0] + a[1] + a[2];", Object::Integer(6)),
            ("[1, 2, 3][3]", NULL),
            ("[1, 2, 3][-1]", NULL),
        ]);
    }

    #[test]
    fn test_identity_equality() {
        assert_evals_to(&[
            ("let a = [1]; a == a", TRUE),
            ("[1] == [1]", FALSE),
            ("let a = [1]; let b = a; a != b", FALSE),
            ("let f = fn() { 1 }; f == f", TRUE),
            ("fn() { 1 } == fn() { 1 }", FALSE),
            ("len == len", TRUE),
            ("len == first", FALSE),
            ("if (false) { 1 } == if (false) { 2 }", TRUE),
        ]);
    }

    #[test]
    fn test_builtins() {
        assert_evals_to(&[
            ("len(\"\")", Object::Integer(0)),
            ("len(\"hi\")", Object::Integer(2)),
            ("len([1, 2, 3])", Object::Integer(3)),
            ("first([])", NULL),
            ("last([1, 2, 3])", Object::Integer(3)),
            ("rest(rest([1, 2, 3]))", Object::array(vec![Object::Integer(3)])),
            (
                "let a = [1, 2]; let b = push(a, 3); len(a) * 10 + len(b)",
                Object::Integer(23),
            ),
            ("let l = len; l([1])", Object::Integer(1)),
            ("let len = fn(x) { 42 }; len(\"abc\")", Object::Integer(42)),
        ]);

        assert_eq!(
            eval_error("len(1)"),
            "argument to `len` not supported, got INTEGER"
        );
        assert_eq!(
            eval_error("len(\"one\", \"two\")"),
            "wrong number of arguments. got=2, want=1"
        );
        assert_eq!(eval_error("push(1, 1)"), "argument to `push` must be ARRAY, got INTEGER");
        assert_eq!(eval_source("len").to_string(), "builtin function len");
    }

    #[test]
    fn test_puts_writes_to_output() {
        let mut output = vec![];
        let mut interpreter = Interpreter::new_with_output(&mut output);
        let result = interpreter.eval_program(&parse("puts(\"a\", 1 + 1, [true]); puts()"));

        assert_eq!(result, NULL);
        drop(interpreter);
        assert_eq!(String::from_utf8(output).unwrap(), "a\n2\n[true]\n");
    }

    #[test]
    fn test_globals_persist_between_programs() {
        let mut interpreter = Interpreter::new_with_output(io::sink());

        interpreter.eval_program(&parse("let x = 2; let double = fn(y) { y * 2 };"));
        assert_eq!(interpreter.eval_program(&parse("double(x)")), Object::Integer(4));

        // A failed call must not leave the interpreter inside the callee's scope.
        let result = interpreter.eval_program(&parse("let f = fn(z) { z + true }; f(1)"));
        assert!(matches!(result, Object::Error(_)));
        assert_eq!(interpreter.eval_program(&parse("z")), eval_source("z"));
        assert_eq!(interpreter.eval_program(&parse("x")), Object::Integer(2));
    }

    #[test]
    fn test_call_depth_limit() {
        let mut interpreter = Interpreter::new_with_output(io::sink()).with_max_depth(10);
        let countdown = "let countdown = fn(n) { if (n == 0) { 0 } else { countdown(n - 1) } };";
        interpreter.eval_program(&parse(countdown));

        assert_eq!(interpreter.eval_program(&parse("countdown(9)")), Object::Integer(0));
        assert_eq!(
            interpreter.eval_program(&parse("countdown(10)")),
            Object::Error(RuntimeError::CallDepthExceeded(10))
        );
        assert_eq!(interpreter.eval_program(&parse("countdown(5)")), Object::Integer(0));
    }

    #[test]
    fn test_unbounded_recursion_is_an_error() {
        assert_eq!(
            eval_error("let f = fn(x) { f(x + 1) }; f(0)"),
            format!("maximum call depth of {} exceeded", DEFAULT_MAX_DEPTH)
        );
        assert_eq!(
            eval_source("let sum = fn(n) { if (n == 0) { 0 } else { n + sum(n - 1) } }; sum(500)"),
            Object::Integer(125250)
        );
    }

    #[test]
    fn test_deeply_nested_expression() {
        let depth = 2000;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(eval_source(&source), Object::Integer(1));

        let source = format!("{}true", "!".repeat(depth));
        assert_eq!(eval_source(&source), TRUE);
    }
}
