//! Dataset upload page: author sub-forms, validation, multipart submission
//! and the temp-file format check.

mod authors;
mod file_check;
mod upload;
mod validation;

pub use authors::{
    author_field_name, show_upload_dataset, AuthorBlock, AuthorBlockSpec, AuthorField,
    AuthorFormBuilder,
};
pub use file_check::{interpret_check, validate_temp_file, FileCheckStatus};
pub use upload::{interpret_upload, should_submit_field, UploadOutcome};
pub use validation::{
    is_valid_orcid, validate_basic_info, validate_orcids, ValidationError, MIN_TEXT_LENGTH,
};

use crate::config::PageConfig;
use crate::error::WebResult;

/// Wire whichever upload-page controls exist on this page.
pub fn install(config: &PageConfig) -> WebResult<()> {
    authors::install()?;
    upload::install(config)?;
    Ok(())
}
