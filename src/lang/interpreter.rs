use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;
use tracing::{debug, trace};
use crate::lang::ast::{BinaryOperator, Decl, Expr, FunctionDecl, Program, Stmt};
use crate::lang::environment::{AssignPolicy, Environment};
use crate::lang::io::{InputChannel, OutputChannel, StdInput, StdOutput};
use crate::lang::value::{Builtin, Value};


/// Low enough that unoptimized builds stay inside a 2 MiB thread stack.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),
    #[error("Undefined function '{0}'")]
    UndefinedFunction(String),
    #[error("Can only call named functions")]
    NotCallable,
    #[error("Unsupported operand types for '{operator}': {left} and {right}")]
    TypeMismatch {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow in '{0}'")]
    Overflow(&'static str),
    #[error("Maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
    #[error("Failed to read input: {0}")]
    InputFailed(#[source] io::Error),
    #[error("Failed to write output: {0}")]
    OutputFailed(#[source] io::Error),
}

impl RuntimeError {
    pub fn type_mismatch(operator: BinaryOperator, left: &Value, right: &Value) -> RuntimeError {
        RuntimeError::TypeMismatch {
            operator: operator.symbol(),
            left: left.type_name(),
            right: right.type_name(),
        }
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterpreterOptions {
    pub assign_policy: AssignPolicy,
    /// Nested user function calls allowed before giving up.
    pub max_call_depth: usize,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        InterpreterOptions {
            assign_policy: AssignPolicy::default(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

pub struct Interpreter<I = StdInput, O = StdOutput> {
    globals: Rc<RefCell<Environment>>,
    functions: HashMap<String, Rc<FunctionDecl>>,
    input: I,
    output: O,
    options: InterpreterOptions,
    depth: usize,
}

impl Interpreter<StdInput, StdOutput> {
    pub fn new() -> Self {
        Self::with_options(InterpreterOptions::default())
    }

    pub fn with_options(options: InterpreterOptions) -> Self {
        Self::with_channels(StdInput, StdOutput, options)
    }
}

impl Default for Interpreter<StdInput, StdOutput> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: InputChannel, O: OutputChannel> Interpreter<I, O> {
    pub fn with_channels(input: I, output: O, options: InterpreterOptions) -> Self {
        let globals = Environment::new_global(options.assign_policy);

        for builtin in Builtin::ALL {
            globals.borrow_mut().define(builtin.name(), Value::Builtin(builtin));
        }

        Interpreter {
            globals,
            functions: HashMap::new(),
            input,
            output,
            options,
            depth: 0,
        }
    }

    pub fn globals(&self) -> Rc<RefCell<Environment>> {
        Rc::clone(&self.globals)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_channels(self) -> (I, O) {
        (self.input, self.output)
    }

    /// Runs a program in two phases. Declarations are processed in order:
    /// functions are registered (a later declaration replaces an earlier one
    /// with the same name) and top-level statements run right away. Afterwards
    /// `main` is called if one was declared.
    pub fn interpret(&mut self, program: &Program) -> RuntimeResult<()> {
        let globals = self.globals();

        for decl in &program.declarations {
            match decl {
                Decl::Function(function) => {
                    trace!(function = %function.name, "registering function");
                    self.functions.insert(function.name.clone(), Rc::new(function.clone()));
                },
                Decl::Statement(stmt) => self.execute(stmt, &globals)?,
            }
        }

        if self.has_function("main") {
            debug!("calling main");
            self.call_function("main")?;
        } else {
            debug!("no main function declared");
        }

        Ok(())
    }

    pub fn execute(&mut self, stmt: &Stmt, env: &Rc<RefCell<Environment>>) -> RuntimeResult<()> {
        match stmt {
            Stmt::Var { name, initializer } => {
                let value = self.evaluate(initializer, env)?;
                env.borrow_mut().define(name, value);
            },
            Stmt::Assign { name, value } => {
                let value = self.evaluate(value, env)?;
                env.borrow_mut().assign(name, value)?;
            },
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition, env)?.is_truthy() {
                    self.execute_all(then_branch, env)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute_all(else_branch, env)?;
                }
            },
            Stmt::While { condition, body } => {
                while self.evaluate(condition, env)?.is_truthy() {
                    self.execute_all(body, env)?;
                }
            },
            Stmt::Expression(expr) => {
                self.evaluate(expr, env)?;
            },
        }

        Ok(())
    }

    // Blocks don't open a scope of their own
    fn execute_all(&mut self, statements: &[Stmt], env: &Rc<RefCell<Environment>>) -> RuntimeResult<()> {
        statements.iter().try_for_each(|stmt| self.execute(stmt, env))
    }

    pub fn evaluate(&mut self, expr: &Expr, env: &Rc<RefCell<Environment>>) -> RuntimeResult<Value> {
        match expr {
            Expr::Literal(text) => Ok(Value::from_literal(text)),
            Expr::Identifier(name) => env.borrow().get(name)
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),
            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left, env)?;
                let right = self.evaluate(right, env)?;

                Value::apply(*operator, left, right)
            },
            Expr::Call { callee, args } => {
                let name = match callee.as_ref() {
                    Expr::Identifier(name) => name,
                    _ => return Err(RuntimeError::NotCallable),
                };

                let args = args.iter()
                    .map(|arg| self.evaluate(arg, env))
                    .collect::<RuntimeResult<Vec<Value>>>()?;

                let bound = self.globals.borrow().get(name);

                match bound {
                    Some(Value::Builtin(builtin)) => self.call_builtin(builtin, &args),
                    // Functions take no parameters, so the evaluated arguments are dropped
                    _ => self.call_function(name),
                }
            },
        }
    }

    fn call_builtin(&mut self, builtin: Builtin, args: &[Value]) -> RuntimeResult<Value> {
        match builtin {
            Builtin::Say => {
                self.output.write_values(args).map_err(RuntimeError::OutputFailed)?;
                Ok(Value::Unit)
            },
            Builtin::Spill => {
                let prompt = args.first().map(Value::to_string);
                let line = self.input.read_line(prompt.as_deref()).map_err(RuntimeError::InputFailed)?;

                Ok(Value::Str(line))
            },
        }
    }

    fn call_function(&mut self, name: &str) -> RuntimeResult<Value> {
        let function = match self.functions.get(name) {
            Some(function) => Rc::clone(function),
            None => return Err(RuntimeError::UndefinedFunction(name.to_owned())),
        };

        if self.depth >= self.options.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded(self.options.max_call_depth));
        }

        debug!(function = name, depth = self.depth, "calling function");

        let env = Environment::new_with_parent(self.globals());

        self.depth += 1;
        let result = self.execute_all(&function.body, &env);
        self.depth -= 1;

        result.map(|_| Value::Unit)
    }
}
