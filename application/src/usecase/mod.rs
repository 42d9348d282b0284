mod gallery;
mod result;

pub use gallery::{split_into_columns, GalleryUseCase, GalleryUseCaseImpl};
pub use result::{suggested_file_name, ResultUseCase, ResultUseCaseImpl};
