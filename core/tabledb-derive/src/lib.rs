//! Procedural macros for the tabledb engine.
//!
//! Provides `#[derive(TableRecord)]` for mapping a struct onto a table row.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derive macro mapping a struct with named fields onto a table.
///
/// # Example
///
/// ```ignore
/// #[derive(TableRecord)]
/// #[tdb(table_name = "users")]
/// pub struct User {
///     #[tdb(primary_key)]
///     pub id: i64,
///     pub name: String,
///     pub score: f64,
/// }
/// ```
///
/// Generates:
/// - `TableRecord` (`TABLE_NAME`, `columns()`), one column per field in
///   declaration order
/// - `FromRow` and `IntoRow` implementations
///
/// Without `table_name` the lowercased struct name is used.
#[proc_macro_derive(TableRecord, attributes(tdb))]
pub fn derive_table_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let table_name = match extract_table_name(input)? {
        Some(table_name) => table_name,
        None => name.to_string().to_lowercase(),
    };

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "TableRecord can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "TableRecord can only be derived for structs",
            ));
        }
    };

    let mut columns = Vec::with_capacity(fields.len());
    let mut from_row_fields = Vec::with_capacity(fields.len());
    let mut into_row_values = Vec::with_capacity(fields.len());

    for (idx, field) in fields.iter().enumerate() {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let column_name = ident.to_string();
        let ty = &field.ty;
        let primary_key = is_primary_key(field)?;

        columns.push(quote! {
            ::tabledb_core::Column {
                name: ::std::string::String::from(#column_name),
                data_type: <#ty as ::tabledb_core::api::ColumnType>::DATA_TYPE,
                indexed: #primary_key,
            }
        });
        from_row_fields.push(quote! {
            #ident: ::tabledb_core::api::column_value::<#ty>(row, #idx, #column_name)?
        });
        into_row_values.push(quote! {
            ::tabledb_core::api::IntoValue::into_value(self.#ident)
        });
    }

    let field_count = columns.len();

    Ok(quote! {
        impl ::tabledb_core::api::TableRecord for #name {
            const TABLE_NAME: &'static str = #table_name;

            fn columns() -> ::std::vec::Vec<::tabledb_core::Column> {
                ::std::vec![#(#columns),*]
            }
        }

        impl ::tabledb_core::api::FromRow for #name {
            fn from_row(row: &[::tabledb_core::Value]) -> ::tabledb_core::TdbResult<Self> {
                if row.len() != #field_count {
                    return ::std::result::Result::Err(::tabledb_core::TdbError::ColumnCountMismatch {
                        table: ::std::string::String::from(#table_name),
                        expected: #field_count,
                        actual: row.len(),
                    });
                }
                ::std::result::Result::Ok(Self {
                    #(#from_row_fields),*
                })
            }
        }

        impl ::tabledb_core::api::IntoRow for #name {
            fn into_row(self) -> ::std::vec::Vec<::tabledb_core::Value> {
                ::std::vec![#(#into_row_values),*]
            }
        }
    })
}

fn extract_table_name(input: &DeriveInput) -> syn::Result<Option<String>> {
    let mut table_name = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("tdb")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table_name") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                table_name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `table_name = \"...\"`"))
            }
        })?;
    }
    Ok(table_name)
}

fn is_primary_key(field: &syn::Field) -> syn::Result<bool> {
    let mut primary_key = false;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("tdb")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("primary_key") {
                primary_key = true;
                Ok(())
            } else {
                Err(meta.error("expected `primary_key`"))
            }
        })?;
    }
    Ok(primary_key)
}
