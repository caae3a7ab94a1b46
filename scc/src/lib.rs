pub mod compiler;

use scc_ast::AstNode;
use scc_ctx::CompilerConfig;
use scc_errors::Diagnostic;

use compiler::CompilerPipeline;

/// Compiles a parsed program straight to assembly text.
pub fn compile_to_asm(nodes: &mut [AstNode], config: CompilerConfig) -> Result<String, Diagnostic> {
    let mut comp = CompilerPipeline::new(config);
    comp.compile(nodes).map(|program| program.asm())
}
