use alder_codegen::CodegenError;
use alder_options::OptionsError;
use alder_tree::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("tree construction: {0}")]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Options(#[from] OptionsError),
}
