//! Strict lookups where Tera would otherwise tolerate undefined values.
//!
//! Tera already fails on an undefined variable in `{{ }}`, loop containers,
//! math and comparisons. It does not in two places: a bare variable used as
//! a condition (`{% if Values.x %}`, either side of `and`/`or`, `not x`)
//! quietly evaluates to false, and an expression whose first filter is
//! `default` falls back instead of failing. [`tighten`] rewrites a parsed
//! template so both fail too:
//!
//! - such conditions become a `truthy` test taking the original expression as
//!   its argument, so the lookup error propagates;
//! - `default` becomes `default_if_null`, which only replaces a value that is
//!   present and null.
//!
//! `is defined` / `is undefined` remain the way to probe for an optional key.

use std::collections::HashMap;

use tera::ast::{Expr, ExprVal, FunctionCall, LogicOperator, MacroDefinition, Node, Test};
use tera::{Tera, Value};

const TRUTHY: &str = "truthy";
const DEFAULT_IF_NULL: &str = "default_if_null";

/// Register the tester and filter that rewritten templates call.
pub(crate) fn register(tera: &mut Tera) {
    tera.register_tester(TRUTHY, truthy);
    tera.register_filter(DEFAULT_IF_NULL, default_if_null);
}

/// Rewrite template `name` in place. Safe to apply more than once.
pub(crate) fn tighten(tera: &mut Tera, name: &str) {
    let Some(template) = tera.templates.get_mut(name) else {
        return;
    };
    tighten_nodes(&mut template.ast);
    for definition in template.macros.values_mut() {
        tighten_macro(definition);
    }
    for block in template.blocks.values_mut() {
        tighten_nodes(&mut block.body);
    }
    for chain in template.blocks_definitions.values_mut() {
        for (_, block) in chain {
            tighten_nodes(&mut block.body);
        }
    }
}

fn truthy(_found: Option<&Value>, args: &[Value]) -> tera::Result<bool> {
    let value = args
        .first()
        .ok_or_else(|| tera::Error::msg("the `truthy` test needs one argument"))?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i != 0,
            (_, Some(u)) => u != 0,
            _ => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        },
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

fn default_if_null(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    if !value.is_null() {
        return Ok(value.clone());
    }
    args.get("value")
        .cloned()
        .ok_or_else(|| tera::Error::msg("The `default` filter requires a `value` argument."))
}

// ---------------------------------------------------------------------------
// AST walk
// ---------------------------------------------------------------------------

fn tighten_nodes(nodes: &mut [Node]) {
    for node in nodes {
        match node {
            Node::VariableBlock(_, expr) => tighten_expr(expr, false),
            Node::MacroDefinition(_, definition, _) => tighten_macro(definition),
            Node::Set(_, set) => tighten_expr(&mut set.value, false),
            Node::FilterSection(_, section, _) => {
                tighten_call(&mut section.filter);
                tighten_nodes(&mut section.body);
            }
            Node::Block(_, block, _) => tighten_nodes(&mut block.body),
            Node::Forloop(_, forloop, _) => {
                tighten_expr(&mut forloop.container, false);
                tighten_nodes(&mut forloop.body);
                if let Some(body) = &mut forloop.empty_body {
                    tighten_nodes(body);
                }
            }
            Node::If(branches, _) => {
                for (_, condition, body) in &mut branches.conditions {
                    tighten_expr(condition, true);
                    tighten_nodes(body);
                }
                if let Some((_, body)) = &mut branches.otherwise {
                    tighten_nodes(body);
                }
            }
            _ => {}
        }
    }
}

fn tighten_macro(definition: &mut MacroDefinition) {
    for default in definition.args.values_mut().flatten() {
        tighten_expr(default, false);
    }
    tighten_nodes(&mut definition.body);
}

fn tighten_call(call: &mut FunctionCall) {
    for arg in call.args.values_mut() {
        tighten_expr(arg, false);
    }
}

/// `condition` is true where Tera evaluates `expr` for truthiness.
fn tighten_expr(expr: &mut Expr, condition: bool) {
    for filter in &mut expr.filters {
        if filter.name == "default" {
            filter.name = DEFAULT_IF_NULL.to_string();
        }
        tighten_call(filter);
    }

    if let ExprVal::Ident(ident) = &expr.val {
        if condition || expr.negated {
            let ident = ident.clone();
            let test = Test {
                ident,
                negated: expr.negated,
                name: TRUTHY.to_string(),
                args: vec![Expr {
                    val: std::mem::replace(&mut expr.val, ExprVal::Bool(false)),
                    negated: false,
                    filters: std::mem::take(&mut expr.filters),
                }],
            };
            expr.val = ExprVal::Test(test);
            expr.negated = false;
        }
        return;
    }

    match &mut expr.val {
        ExprVal::Logic(logic) => {
            let operands_are_conditions =
                matches!(logic.operator, LogicOperator::And | LogicOperator::Or);
            tighten_expr(&mut logic.lhs, operands_are_conditions);
            tighten_expr(&mut logic.rhs, operands_are_conditions);
        }
        ExprVal::Math(math) => {
            tighten_expr(&mut math.lhs, false);
            tighten_expr(&mut math.rhs, false);
        }
        ExprVal::In(within) => {
            tighten_expr(&mut within.lhs, false);
            tighten_expr(&mut within.rhs, false);
        }
        ExprVal::Test(test) => {
            for arg in &mut test.args {
                tighten_expr(arg, false);
            }
        }
        ExprVal::MacroCall(call) => {
            for arg in call.args.values_mut() {
                tighten_expr(arg, false);
            }
        }
        ExprVal::FunctionCall(call) => tighten_call(call),
        ExprVal::Array(items) => {
            for item in items {
                tighten_expr(item, false);
            }
        }
        _ => {}
    }
}
