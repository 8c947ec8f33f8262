mod record;

use proc_macro::TokenStream;

/// Derive macro implementing `tiered_store::Record`.
///
/// The identifier field is the one marked `#[record(id)]`, or else the field
/// named `id`. It may be a `String` or an `Option<String>`.
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Record)]
/// struct User {
///     #[record(id)]
///     pub username: String,
///     pub email: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}
