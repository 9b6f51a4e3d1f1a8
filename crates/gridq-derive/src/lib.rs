//! Derive macros for Gridq entities.

use proc_macro::TokenStream;

mod entity;

///
/// Entity
///
/// Generates the static `EntityModel` descriptor plus the `EntitySchema`
/// and `EntityValue` implementations for a named struct.
///
/// ```ignore
/// #[derive(Clone, Debug, Default, Entity)]
/// #[entity(table = "shifts")]
/// pub struct Shift {
///     #[entity(key, column = "shift_id")]
///     pub id: Ulid,
///     #[entity(column = "shift_code", required)]
///     pub code: String,
///     pub derived_only: String, // no column: readable, never written
/// }
/// ```
///
/// The key is the field marked `#[entity(key)]`; without one, a field
/// named `{Type}Id` / `{type}_id`, then `id`, is used. A struct with no
/// discoverable key does not compile. The type must implement `Default`
/// (row decoding starts from it) and every field type must implement
/// `FieldValue`.
///
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input.into()).into()
}
