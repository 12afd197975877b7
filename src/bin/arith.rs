//! Command-line arithmetic over tokenized chains
//!
//! Every argument is one chain element: `arith 7 / 2`, `arith 8 - 3 - 2`,
//! `arith 2s + 500ms`. Arguments starting with `$` are untyped variables
//! bound with `--var name=value`. Options must precede the chain.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::Parser;
use log::debug;
use script_arithmetic::{
    ArithmeticExpression, Arithmetics, DifferenceExpression, EvaluationContext, ExpressionOperand,
    Literal, Operand, Operator, Timespan, TypeInfo, Value, Variable, Vector,
    create_standard_registry,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "arith")]
#[command(about = "Evaluate script arithmetic from an already tokenized chain")]
#[command(version)]
struct Cli {
    /// Bind a variable, e.g. `--var x=5` or `--var t=2s`
    #[arg(long = "var", value_name = "NAME=VALUE")]
    vars: Vec<String>,

    /// Print the parsed evaluation tree
    #[arg(long)]
    tree: bool,

    /// Compute the difference between exactly two operands
    #[arg(long)]
    difference: bool,

    /// Alternating operands and operators
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    chain: Vec<String>,
}

fn main() -> Result<()> {
    human_panic::setup_panic!();
    env_logger::init();

    let cli = Cli::parse();
    let registry = create_standard_registry().context("failed to build the operation registry")?;

    let mut context = EvaluationContext::new();
    for binding in &cli.vars {
        let (name, value) = binding
            .split_once('=')
            .with_context(|| format!("variable binding '{binding}' is not of the form NAME=VALUE"))?;
        context.set_variable(name, parse_value(value));
    }

    let (value, return_type) = if cli.difference {
        let expr = build_difference(registry, &cli.chain)?;
        if cli.tree {
            println!("{expr}");
        }
        (expr.get(&context), expr.return_type())
    } else {
        let expr = build_expression(&registry, &cli.chain)?;
        if cli.tree {
            println!("{}", expr.gettable());
        }
        (expr.get(&context), expr.return_type())
    };

    match value {
        Some(value) => println!("{value}"),
        None => println!("<none>"),
    }
    println!("type: {return_type}");
    Ok(())
}

/// Fold the chain left to right into nested, ungrouped expressions, the way a
/// script parser hands them over
fn build_expression(registry: &Arc<Arithmetics>, tokens: &[String]) -> Result<ArithmeticExpression> {
    let Some((first, rest)) = tokens.split_first() else {
        bail!("empty chain");
    };
    if rest.is_empty() || rest.len() % 2 != 0 {
        bail!("expected alternating operands and operators, got {} elements", tokens.len());
    }

    let mut current = ExpressionOperand::shared(parse_operand(first));
    let mut expression = None;
    for pair in rest.chunks(2) {
        let operator = parse_operator(&pair[0])?;
        let operand = ExpressionOperand::shared(parse_operand(&pair[1]));
        if let Some(previous) = expression.take() {
            current = ExpressionOperand::expression(previous);
        }
        expression = Some(ArithmeticExpression::new(
            Arc::clone(registry),
            current.clone(),
            operator,
            operand,
        )?);
    }
    expression.context("chain holds no operator")
}

fn build_difference(registry: Arc<Arithmetics>, tokens: &[String]) -> Result<DifferenceExpression> {
    let [first, second] = tokens else {
        bail!("a difference takes exactly two operands, got {}", tokens.len());
    };
    Ok(DifferenceExpression::new(
        registry,
        parse_operand(first),
        parse_operand(second),
    )?)
}

fn parse_operator(token: &str) -> Result<Operator> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(sign), None) => {
            Operator::from_sign(sign).with_context(|| format!("'{token}' is not an operator"))
        }
        _ => bail!("'{token}' is not an operator"),
    }
}

fn parse_operand(token: &str) -> Arc<dyn Operand> {
    match token.strip_prefix('$') {
        Some(name) => Arc::new(Variable::new(name)),
        None => Arc::new(Literal::new(parse_value(token))),
    }
}

/// Interpret a literal token; anything unrecognized is a string
fn parse_value(token: &str) -> Value {
    if let Ok(b) = token.parse::<bool>() {
        return Value::Boolean(b);
    }
    if let Ok(i) = token.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(d) = token.parse::<f64>() {
        return Value::Decimal(d);
    }
    if let Some(timespan) = parse_timespan(token) {
        return Value::Timespan(timespan);
    }
    if let Some(vector) = parse_vector(token) {
        return Value::Vector(vector);
    }
    if let Ok(date) = NaiveDate::parse_from_str(token, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Value::Date(Utc.from_utc_datetime(&midnight));
        }
    }

    let unquoted = token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token);
    debug!("Treating '{token}' as a {} literal", TypeInfo::String);
    Value::String(unquoted.to_string())
}

fn parse_timespan(token: &str) -> Option<Timespan> {
    const UNITS: [(&str, f64); 5] = [
        ("ms", 1.0),
        ("s", 1_000.0),
        ("m", 60_000.0),
        ("h", 3_600_000.0),
        ("d", 86_400_000.0),
    ];
    UNITS.iter().find_map(|(suffix, millis)| {
        let amount: f64 = token.strip_suffix(suffix)?.parse().ok()?;
        (amount.is_finite() && amount >= 0.0)
            .then(|| Timespan::from_millis((amount * millis).round() as u64))
    })
}

fn parse_vector(token: &str) -> Option<Vector> {
    let components: Vec<f64> = token
        .split(',')
        .map(|c| c.trim().parse().ok())
        .collect::<Option<_>>()?;
    match components.as_slice() {
        [x, y, z] => Some(Vector::new(*x, *y, *z)),
        _ => None,
    }
}
