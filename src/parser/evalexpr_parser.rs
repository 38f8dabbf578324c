//! Parser service backed by the `evalexpr` crate.

use super::functions::{FunctionRegistry, ScoreFunction};
use super::types::{CompiledExpression, ParserService};
use crate::error::ExpressionError;
use evalexpr::{
    build_operator_tree, ContextWithMutableFunctions, ContextWithMutableVariables,
    EvalexprError, EvalexprResult, Function, HashMapContext, Node, Operator, Value,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// [`ParserService`] for `evalexpr` syntax (`ch * 12.5`, `a > 3 && b < 1`).
///
/// Functions of the attached [`FunctionRegistry`] are callable by name next
/// to evalexpr's builtins (`min`, `max`, `floor`, `if`, ...). Boolean results
/// evaluate to `1.0`/`0.0`. Integer literals are compiled as reals, so all
/// arithmetic is floating point (`1 / 2` is `0.5`).
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use u_scorecard::{EvalexprParser, ParserService};
///
/// let parser = EvalexprParser::new();
/// assert_eq!(parser.dependencies("ch * 12.5").unwrap(), vec!["ch"]);
///
/// let expr = parser.compile("ch * 12.5").unwrap();
/// let context = HashMap::from([("ch".to_string(), 5.0)]);
/// assert_eq!(expr.evaluate(&context).unwrap(), 62.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EvalexprParser {
    functions: FunctionRegistry,
}

impl EvalexprParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the functions of `registry` callable from compiled expressions.
    pub fn with_functions(mut self, registry: FunctionRegistry) -> Self {
        self.functions = registry;
        self
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }
}

impl ParserService for EvalexprParser {
    fn dependencies(&self, expression: &str) -> Result<Vec<String>, ExpressionError> {
        let tree = parse(expression)?;

        let mut dependencies: Vec<String> = Vec::new();
        for identifier in tree.iter_variable_identifiers() {
            if !dependencies.iter().any(|d| d == identifier) {
                dependencies.push(identifier.to_string());
            }
        }
        Ok(dependencies)
    }

    fn compile(&self, expression: &str) -> Result<Arc<dyn CompiledExpression>, ExpressionError> {
        let mut tree = parse(expression)?;
        promote_integers(&mut tree);

        let mut functions = HashMapContext::new();
        for (name, function) in self.functions.iter() {
            functions
                .set_function(name.to_string(), to_evalexpr(function.clone()))
                .map_err(|e| ExpressionError::Parse(e.to_string()))?;
        }

        Ok(Arc::new(EvalexprExpression { tree, functions }))
    }
}

fn parse(expression: &str) -> Result<Node, ExpressionError> {
    build_operator_tree(expression).map_err(|e| ExpressionError::Parse(e.to_string()))
}

/// Rewrites integer constants into floats so evalexpr never takes its
/// integer arithmetic path.
fn promote_integers(node: &mut Node) {
    let promoted = match node.operator() {
        Operator::Const {
            value: Value::Int(i),
        } => Some(*i as f64),
        _ => None,
    };
    if let Some(value) = promoted {
        *node.operator_mut() = Operator::Const {
            value: Value::Float(value),
        };
    }
    for child in node.children_mut() {
        promote_integers(child);
    }
}

fn to_evalexpr(function: ScoreFunction) -> Function {
    Function::new(move |argument: &Value| {
        let args = numeric_arguments(argument)?;
        Ok(Value::Float(function(&args)))
    })
}

fn numeric_arguments(argument: &Value) -> EvalexprResult<Vec<f64>> {
    match argument {
        Value::Tuple(values) => values.iter().map(Value::as_number).collect(),
        Value::Empty => Ok(Vec::new()),
        other => Ok(vec![other.as_number()?]),
    }
}

/// Compiled evalexpr operator tree plus a context holding the registry's
/// functions. Each evaluation works on a clone of that context.
struct EvalexprExpression {
    tree: Node,
    functions: HashMapContext,
}

impl fmt::Debug for EvalexprExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalexprExpression")
            .field("tree", &self.tree.to_string())
            .finish_non_exhaustive()
    }
}

impl CompiledExpression for EvalexprExpression {
    fn evaluate(&self, context: &HashMap<String, f64>) -> Result<f64, ExpressionError> {
        let mut ctx = self.functions.clone();
        for (name, value) in context {
            ctx.set_value(name.clone(), Value::Float(*value))
                .map_err(|e| ExpressionError::Evaluation(e.to_string()))?;
        }

        let result = self.tree.eval_with_context(&ctx).map_err(|e| match e {
            EvalexprError::FunctionIdentifierNotFound(name) => {
                ExpressionError::UnknownFunction(name)
            }
            other => ExpressionError::Evaluation(other.to_string()),
        })?;

        match result {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            Value::Boolean(b) => Ok(if b { 1.0 } else { 0.0 }),
            other => Err(ExpressionError::Evaluation(format!(
                "expected numeric result, got {:?}",
                other
            ))),
        }
    }
}
