use super::operator::{InfixOperator, PrefixOperator};

use std::fmt;
use std::rc::Rc;

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Let { name: Identifier, value: Expression },
    Return { value: Expression },
    Expression { expr: Expression },
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    IntegerLiteral(i64),
    StringLiteral(String),
    Boolean(bool),
    Identifier(Identifier),
    Prefix {
        operator: PrefixOperator,
        operand: Box<Expression>,
    },
    Infix {
        operator: InfixOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    FunctionLiteral(Rc<FuncInfo>),
    Call {
        callee: Identifier,
        args: Vec<Expression>,
    },
    ArrayLiteral(Vec<Expression>),
    Index {
        collection: Box<Expression>,
        index: Box<Expression>,
    },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Identifier {
    pub name: String,
}

/// Parameters and body of a function literal. Shared with the runtime
/// function objects built from it.
#[derive(Debug, PartialEq, Clone)]
pub struct FuncInfo {
    pub params: Vec<Identifier>,
    pub body: BlockStatement,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Identifier { name: name.into() }
    }
}

impl FuncInfo {
    pub fn new(params: Vec<Identifier>, body: BlockStatement) -> Self {
        FuncInfo { params, body }
    }
}

impl Expression {
    pub fn prefix(operator: PrefixOperator, operand: Expression) -> Self {
        Expression::Prefix {
            operator,
            operand: Box::new(operand),
        }
    }

    pub fn infix(operator: InfixOperator, left: Expression, right: Expression) -> Self {
        Expression::Infix {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn identifier(name: &str) -> Self {
        Expression::Identifier(Identifier::new(name))
    }
}

fn comma_separated<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for stmt in self.statements.iter() {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {} = {};", name, value),
            Statement::Return { value } => write!(f, "return {};", value),
            Statement::Expression { expr } => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let stmts: Vec<_> = self.statements.iter().map(|s| s.to_string()).collect();
        f.write_str(&stmts.join(" "))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for FuncInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fn({}) {{ {} }}", comma_separated(&self.params), self.body)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::IntegerLiteral(value) => write!(f, "{}", value),
            Expression::StringLiteral(value) => write!(f, "\"{}\"", value),
            Expression::Boolean(value) => write!(f, "{}", value),
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::Prefix { operator, operand } => write!(f, "({}{})", operator, operand),
            Expression::Infix {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if ({}) {{ {} }}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {{ {} }}", alternative)?;
                }
                Ok(())
            }
            Expression::FunctionLiteral(func_info) => write!(f, "{}", func_info),
            Expression::Call { callee, args } => write!(f, "{}({})", callee, comma_separated(args)),
            Expression::ArrayLiteral(elements) => write!(f, "[{}]", comma_separated(elements)),
            Expression::Index { collection, index } => write!(f, "({}[{}])", collection, index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infix_rendering() {
        let expr = Expression::infix(
            InfixOperator::Add,
            Expression::IntegerLiteral(1),
            Expression::IntegerLiteral(2),
        );
        assert_eq!(expr.to_string(), "(1 + 2)");
    }

    #[test]
    fn test_nested_rendering() {
        // -a * (b + c)
        let expr = Expression::infix(
            InfixOperator::Multiply,
            Expression::prefix(PrefixOperator::Negate, Expression::identifier("a")),
            Expression::infix(
                InfixOperator::Add,
                Expression::identifier("b"),
                Expression::identifier("c"),
            ),
        );
        assert_eq!(expr.to_string(), "((-a) * (b + c))");
    }

    #[test]
    fn test_statement_rendering() {
        let program = Program {
            statements: vec![
                Statement::Let {
                    name: Identifier::new("my_var"),
                    value: Expression::identifier("another_var"),
                },
                Statement::Return {
                    value: Expression::Boolean(true),
                },
                Statement::Expression {
                    expr: Expression::StringLiteral("hi".to_owned()),
                },
            ],
        };
        assert_eq!(
            program.to_string(),
            "let my_var = another_var;return true;\"hi\""
        );
    }

    #[test]
    fn test_compound_rendering() {
        let body = BlockStatement {
            statements: vec![Statement::Expression {
                expr: Expression::infix(
                    InfixOperator::Add,
                    Expression::identifier("x"),
                    Expression::identifier("y"),
                ),
            }],
        };
        let func = Expression::FunctionLiteral(Rc::new(FuncInfo::new(
            vec![Identifier::new("x"), Identifier::new("y")],
            body.clone(),
        )));
        assert_eq!(func.to_string(), "fn(x, y) { (x + y) }");

        let if_expr = Expression::If {
            condition: Box::new(Expression::identifier("x")),
            consequence: body,
            alternative: Some(BlockStatement::default()),
        };
        assert_eq!(if_expr.to_string(), "if (x) { (x + y) } else {  }");

        let call = Expression::Call {
            callee: Identifier::new("add"),
            args: vec![Expression::IntegerLiteral(1), Expression::identifier("z")],
        };
        assert_eq!(call.to_string(), "add(1, z)");

        let index = Expression::Index {
            collection: Box::new(Expression::ArrayLiteral(vec![
                Expression::IntegerLiteral(1),
                Expression::IntegerLiteral(2),
            ])),
            index: Box::new(Expression::IntegerLiteral(0)),
        };
        assert_eq!(index.to_string(), "([1, 2][0])");
    }
}
