pub mod books;

use std::sync::Arc;

use booktracker_kernel::ModuleRegistry;

use books::BookRepository;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, books: Arc<dyn BookRepository>) {
    registry.register(books::create_module(books));
}
