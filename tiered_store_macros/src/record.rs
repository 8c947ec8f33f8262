use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Type};

pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field = extract_id_field(input)?;
    let ident = field.ident.as_ref().ok_or_else(|| {
        syn::Error::new_spanned(field, "Record derive: id field must be named")
    })?;

    // Option<String> ids may be absent; plain String ids are always present
    // (emptiness is checked by the stores).
    let body = if is_option(&field.ty) {
        quote! { self.#ident.as_deref() }
    } else {
        quote! { ::core::option::Option::Some(self.#ident.as_str()) }
    };

    Ok(quote! {
        impl #impl_generics ::tiered_store::Record for #name #ty_generics #where_clause {
            fn id(&self) -> ::core::option::Option<&str> {
                #body
            }
        }
    })
}

fn extract_id_field(input: &DeriveInput) -> syn::Result<&Field> {
    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Record derive: only structs with named fields are supported",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record derive: only structs are supported",
            ))
        }
    };

    for field in fields {
        for attr in &field.attrs {
            if !attr.path().is_ident("record") {
                continue;
            }
            let mut is_id = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    is_id = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported record attribute, expected `id`"))
                }
            })?;
            if is_id {
                return Ok(field);
            }
        }
    }

    // Default: look for a field named "id"
    fields
        .iter()
        .find(|field| field.ident.as_ref().is_some_and(|ident| ident == "id"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "Record derive: no field marked with #[record(id)] and no field named `id`",
            )
        })
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
