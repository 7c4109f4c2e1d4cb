//! Machine-readable description of the serialized expression shape
//!
//! Built by hand from the registry rather than derived, so the descriptor
//! always lists exactly the words the tokenizer accepts.

use crate::registry::{self, OPERATORS, STACK_OPS};
use serde_json::{json, Value};

/// A bare identifier or a `${name}` placeholder
const VARIABLE_PATTERN: &str = r"^([A-Za-z_][A-Za-z0-9_]*|\$\{[A-Za-z_][A-Za-z0-9_]*\})$";

/// JSON-Schema style descriptor for `{tokens, defaults, metadata}`
pub fn expression_schema() -> Value {
    let operators: Vec<&str> = OPERATORS.iter().map(|spec| spec.symbol).collect();
    let aliases: Vec<&str> = OPERATORS
        .iter()
        .flat_map(|spec| spec.aliases.iter().copied())
        .collect();
    let constants: Vec<&str> = registry::CONSTANTS.iter().map(|(name, _)| *name).collect();
    let negated: Vec<String> = constants.iter().map(|name| format!("-{}", name)).collect();

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "Expression",
        "description": "A postfix expression: tokens plus default variable values",
        "type": "object",
        "required": ["tokens"],
        "additionalProperties": false,
        "properties": {
            "tokens": {
                "type": "array",
                "description": "Postfix tokens in evaluation order",
                "items": {
                    "oneOf": [
                        { "type": "number", "description": "Numeric literal" },
                        {
                            "type": "string",
                            "description": "Operator or function",
                            "enum": operators
                        },
                        {
                            "type": "string",
                            "description": "Accepted alias spelling",
                            "enum": aliases
                        },
                        {
                            "type": "string",
                            "description": "Stack operation",
                            "enum": STACK_OPS
                        },
                        {
                            "type": "string",
                            "description": "Named constant, folded to its value",
                            "enum": constants
                        },
                        {
                            "type": "string",
                            "description": "Negated constant, folded to its value",
                            "enum": negated
                        },
                        {
                            "type": "string",
                            "description": "Variable name, braced when it spells a reserved word",
                            "pattern": VARIABLE_PATTERN,
                            "not": { "enum": registry::all_words() }
                        }
                    ]
                }
            },
            "defaults": {
                "type": "object",
                "description": "Fallback values for variables missing from the bindings",
                "additionalProperties": {
                    "oneOf": [
                        { "type": "number" },
                        { "type": "string", "enum": ["inf", "-inf", "nan"] }
                    ]
                }
            },
            "metadata": {
                "type": "object",
                "description": "Opaque data carried through serialization"
            }
        }
    })
}
