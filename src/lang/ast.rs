use std::fmt::{Debug, Formatter};
use crate::lang::lexer::TokenType;

fn join_debug<T: Debug>(items: &[T], separator: &str) -> String {
    items.iter().map(|item| format!("{:?}", item)).collect::<Vec<String>>().join(separator)
}

#[derive(Clone, Default, PartialEq)]
pub struct Program {
    pub declarations: Vec<Decl>,
}

impl Program {
    pub fn new(declarations: Vec<Decl>) -> Program {
        Program { declarations }
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Decl::Function(function) => Some(function),
            Decl::Statement(_) => None,
        })
    }
}

impl Debug for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for decl in &self.declarations {
            writeln!(f, "{:?}", decl)?;
        }

        Ok(())
    }
}

#[derive(Clone, PartialEq)]
pub enum Decl {
    Function(FunctionDecl),
    Statement(Stmt),
}

impl Debug for Decl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Decl::Function(function) => write!(f, "{:?}", function),
            Decl::Statement(stmt) => write!(f, "{:?}", stmt),
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    /// Always empty; function declarations take no parameters.
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

impl FunctionDecl {
    pub fn new(name: String, body: Vec<Stmt>) -> FunctionDecl {
        FunctionDecl { name, params: Vec::new(), body }
    }
}

impl Debug for FunctionDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "vibe {}({}) {{ {} }}", self.name, self.params.join(", "), join_debug(&self.body, "; "))
    }
}

#[derive(Clone, PartialEq)]
pub enum Stmt {
    Var {
        name: String,
        initializer: Expr,
    },
    Assign {
        name: String,
        value: Expr,
    },
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    Expression(Expr),
}

impl Debug for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Var { name, initializer } => write!(f, "lit {} = {:?}", name, initializer),
            Stmt::Assign { name, value } => write!(f, "{} = {:?}", name, value),
            Stmt::If { condition, then_branch, else_branch } => {
                write!(f, "if {:?} {{ {} }}", condition, join_debug(then_branch, "; "))?;

                if let Some(else_branch) = else_branch {
                    write!(f, " else {{ {} }}", join_debug(else_branch, "; "))?;
                }

                Ok(())
            },
            Stmt::While { condition, body } => write!(f, "yap {:?} {{ {} }}", condition, join_debug(body, "; ")),
            Stmt::Expression(expr) => write!(f, "{:?}", expr),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add, Subtract, Multiply, Divide,
    Equal, NotEqual,
    Greater, GreaterEqual,
    Less, LessEqual,
}

impl BinaryOperator {
    pub fn from_token_type(token_type: TokenType) -> Option<BinaryOperator> {
        match token_type {
            TokenType::Plus => Some(BinaryOperator::Add),
            TokenType::Minus => Some(BinaryOperator::Subtract),
            TokenType::Multiply => Some(BinaryOperator::Multiply),
            TokenType::Divide => Some(BinaryOperator::Divide),
            TokenType::Equal => Some(BinaryOperator::Equal),
            TokenType::NotEqual => Some(BinaryOperator::NotEqual),
            TokenType::Greater => Some(BinaryOperator::Greater),
            TokenType::GreaterEqual => Some(BinaryOperator::GreaterEqual),
            TokenType::Less => Some(BinaryOperator::Less),
            TokenType::LessEqual => Some(BinaryOperator::LessEqual),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
        }
    }
}

#[derive(Clone, PartialEq)]
pub enum Expr {
    /// Raw literal text; numeric interpretation happens when it is evaluated.
    Literal(String),
    Identifier(String),

    Binary {
        left: Box<Expr>,
        operator: BinaryOperator,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn literal(text: &str) -> Expr {
        Expr::Literal(text.to_owned())
    }

    pub fn identifier(name: &str) -> Expr {
        Expr::Identifier(name.to_owned())
    }

    pub fn binary(left: Expr, operator: BinaryOperator, right: Expr) -> Expr {
        Expr::Binary { left: Box::new(left), operator, right: Box::new(right) }
    }

    pub fn call(name: &str, args: Vec<Expr>) -> Expr {
        Expr::Call { callee: Box::new(Expr::identifier(name)), args }
    }
}

impl Debug for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{:?}", value),
            Expr::Identifier(name) => write!(f, "{}", name),
            Expr::Binary { left, operator, right } => write!(f, "({:?} {} {:?})", left, operator.symbol(), right),
            Expr::Call { callee, args } => write!(f, "{:?}({})", callee, join_debug(args, ", ")),
        }
    }
}
