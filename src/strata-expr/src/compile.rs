//! Public compiler entry.

use serde::Serialize;
use tracing::{instrument, trace};

use common_error::StrataResult;
use strata_core::{compress_expr, Diagnostic, Diagnostics, ExprValue, FieldSpace};

use crate::expr::Expr;
use crate::translate::translate;

/// The result of compiling one expression tree.
#[derive(Debug, Clone, Serialize)]
pub struct Compiled {
    /// The compiled value; type `error` if translation failed anywhere.
    pub value: ExprValue,
    /// Everything logged during translation, in log order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Compiled {
    /// Check that compilation produced a clean value.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty() && !self.value.is_error()
    }

    /// Serialize the compiled result, fragment ABI included, as JSON.
    pub fn to_json(&self) -> StrataResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Compile an expression tree against a field namespace.
///
/// Walks the tree once, accumulating diagnostics instead of aborting;
/// the resulting fragment sequence is compressed (adjacent literal text
/// merged). A `value` of type `error` is always accompanied by at least
/// one diagnostic.
#[instrument(skip_all, fields(element = root.element_type()))]
pub fn compile_expression(root: &Expr, fs: &dyn FieldSpace) -> Compiled {
    let mut diags = Diagnostics::new();
    let mut value = translate(root, fs, &mut diags);
    value.value = compress_expr(value.value);
    trace!(
        data_type = %value.data_type,
        aggregate = value.aggregate,
        diagnostics = diags.len(),
        "expression compiled"
    );
    Compiled {
        value,
        diagnostics: diags.into_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr;
    use strata_core::testing::MapFieldSpace;
    use strata_core::{render, ExprType};

    #[test]
    fn test_compile_compresses() {
        let space = MapFieldSpace::orders();
        let ast = expr::number("1").add(expr::number("2"));
        let compiled = compile_expression(&ast, &space);

        assert!(compiled.is_ok());
        assert_eq!(compiled.value.value.len(), 1);
        assert_eq!(render(&compiled.value.value), "1 + 2");
    }

    #[test]
    fn test_error_comes_with_diagnostics() {
        let space = MapFieldSpace::orders();
        let ast = expr::field("nope");
        let compiled = compile_expression(&ast, &space);

        assert_eq!(compiled.value.data_type, ExprType::Error);
        assert!(!compiled.diagnostics.is_empty());
        assert!(!compiled.is_ok());
    }

    #[test]
    fn test_to_json_carries_abi() {
        let space = MapFieldSpace::orders();
        let ast = expr::sum(expr::field("price"));
        let json = compile_expression(&ast, &space).to_json().unwrap();
        assert!(json.contains("\"type\":\"aggregate\""));
        assert!(json.contains("\"function\":\"sum\""));
    }
}
