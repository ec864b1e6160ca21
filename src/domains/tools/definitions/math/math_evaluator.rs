//! Math evaluator tool definition.
//!
//! Expressions are parsed by recursive descent over this grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | constant | function '(' expr ')' | '(' expr ')'
//! ```
//!
//! Trigonometric functions take degrees.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the math evaluator.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MathParams {
    #[serde(default)]
    pub expression: String,
}

/// Deepest nesting of parentheses, signs and exponents accepted.
const MAX_DEPTH: usize = 256;

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, msg: &str) -> ToolError {
        ToolError::invalid_arguments(format!("Invalid expression: {msg} at position {}", self.pos))
    }

    fn skip_whitespace(&mut self) {
        while self.input.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse(mut self) -> ToolResult<f64> {
        let value = self.expr()?;
        if self.peek().is_some() {
            return Err(self.error("unexpected character"));
        }
        Ok(value)
    }

    fn expr(&mut self) -> ToolResult<f64> {
        let mut value = self.term()?;
        loop {
            if self.eat(b'+') {
                value += self.term()?;
            } else if self.eat(b'-') {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> ToolResult<f64> {
        let mut value = self.unary()?;
        loop {
            if self.eat(b'*') {
                value *= self.unary()?;
            } else if self.eat(b'/') {
                let divisor = self.unary()?;
                if divisor == 0.0 {
                    return Err(ToolError::invalid_arguments("Division by zero"));
                }
                value /= divisor;
            } else {
                return Ok(value);
            }
        }
    }

    // Every recursive path passes through here.
    fn unary(&mut self) -> ToolResult<f64> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ToolError::invalid_arguments("Expression is nested too deeply"));
        }

        let value = if self.eat(b'-') {
            self.unary().map(|v| -v)
        } else if self.eat(b'+') {
            self.unary()
        } else {
            self.power()
        };

        self.depth -= 1;
        value
    }

    fn power(&mut self) -> ToolResult<f64> {
        let base = self.primary()?;
        if self.eat(b'^') {
            Ok(base.powf(self.unary()?))
        } else {
            Ok(base)
        }
    }

    fn primary(&mut self) -> ToolResult<f64> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let value = self.expr()?;
                if !self.eat(b')') {
                    return Err(self.error("expected ')'"));
                }
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.identifier(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn number(&mut self) -> ToolResult<f64> {
        let start = self.pos;
        while self
            .input
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_digit() || *c == b'.')
        {
            self.pos += 1;
        }
        // Optional exponent, e.g. 1.5e3.
        if matches!(self.input.get(self.pos), Some(b'e' | b'E'))
            && self
                .input
                .get(self.pos + 1)
                .is_some_and(|c| c.is_ascii_digit() || *c == b'-' || *c == b'+')
        {
            self.pos += 2;
            while self.input.get(self.pos).is_some_and(u8::is_ascii_digit) {
                self.pos += 1;
            }
        }

        std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|text| text.parse::<f64>().ok())
            .ok_or_else(|| self.error("malformed number"))
    }

    fn identifier(&mut self) -> ToolResult<f64> {
        let start = self.pos;
        while self
            .input
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_alphanumeric())
        {
            self.pos += 1;
        }
        let name = String::from_utf8_lossy(&self.input[start..self.pos]).to_lowercase();

        match name.as_str() {
            "pi" => return Ok(std::f64::consts::PI),
            "e" => return Ok(std::f64::consts::E),
            _ => {}
        }

        if !self.eat(b'(') {
            return Err(self.error(&format!("unknown identifier '{name}'")));
        }
        let arg = self.expr()?;
        if !self.eat(b')') {
            return Err(self.error("expected ')'"));
        }

        match name.as_str() {
            "sqrt" => Ok(arg.sqrt()),
            "sin" => Ok(arg.to_radians().sin()),
            "cos" => Ok(arg.to_radians().cos()),
            "tan" => Ok(arg.to_radians().tan()),
            "abs" => Ok(arg.abs()),
            "log10" => Ok(arg.log10()),
            "log" => Ok(arg.ln()),
            "exp" => Ok(arg.exp()),
            _ => Err(self.error(&format!("unknown function '{name}'"))),
        }
    }
}

/// Evaluate an arithmetic expression.
pub fn evaluate(expression: &str) -> ToolResult<f64> {
    let value = Parser::new(expression).parse()?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ToolError::invalid_arguments("Result is not a finite number"))
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Evaluates arithmetic expressions with common functions.
pub struct MathEvaluatorTool;

impl MathEvaluatorTool {
    pub const NAME: &'static str = "Math Evaluator";
    pub const CATEGORY: &'static str = "Math";
    pub const DESCRIPTION: &'static str =
        "Evaluate mathematical expressions including sqrt, sin, cos, abs, and more.";
}

impl Tool for MathEvaluatorTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn category(&self) -> &str {
        Self::CATEGORY
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn input_schema(&self) -> Value {
        schema_of::<MathParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: MathParams = parse_params(input)?;
        if params.expression.trim().is_empty() {
            return Err(ToolError::invalid_arguments("Expression is required."));
        }
        debug!("Evaluating {} byte expression", params.expression.len());
        Ok(json!(format!("{:.6}", evaluate(&params.expression)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(evaluate("1 + 2 * 3").unwrap(), 7.0);
        assert_eq!(evaluate("(1 + 2) * 3").unwrap(), 9.0);
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(evaluate("2 ^ 3 ^ 2").unwrap(), 512.0);
        assert_eq!(evaluate("-2 ^ 2").unwrap(), -4.0);
        assert_eq!(evaluate("2 * -3").unwrap(), -6.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert!((evaluate("sin(30)").unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(evaluate("sqrt(16) + abs(-2)").unwrap(), 6.0);
        assert!((evaluate("log10(1000)").unwrap() - 3.0).abs() < 1e-12);
        assert!((evaluate("log(e)").unwrap() - 1.0).abs() < 1e-12);
        assert!((evaluate("2 * PI").unwrap() - std::f64::consts::TAU).abs() < 1e-12);
        assert_eq!(evaluate("1.5e3").unwrap(), 1500.0);
    }

    #[test]
    fn test_formatted_output() {
        let result = MathEvaluatorTool
            .execute(&json!({ "expression": "10 / 4" }))
            .unwrap();
        assert_eq!(result, json!("2.500000"));
    }

    #[test]
    fn test_errors() {
        for expression in ["1 +", "(1", "foo(2)", "2 $ 3", "1 / 0", "sqrt(-1)", "x"] {
            assert!(evaluate(expression).is_err(), "{expression} should fail");
        }
        assert!(MathEvaluatorTool.execute(&json!({ "expression": " " })).is_err());
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let parens = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        let signs = format!("{}1", "-".repeat(100_000));
        let powers = vec!["1"; 100_000].join("^");

        for expression in [&parens, &signs, &powers] {
            let err = evaluate(expression).unwrap_err();
            assert_eq!(err.message(), "Expression is nested too deeply");
        }

        let nested = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(evaluate(&nested).unwrap(), 1.0);
        assert_eq!(evaluate("--1").unwrap(), 1.0);
    }
}
