pub mod static_files;
pub mod templates;

pub use static_files::create_static_router;
pub use templates::{
    module_path, render_error_page, render_module_edit_form, render_module_edit_page,
    render_modules_page, render_modules_page_with_message,
};
