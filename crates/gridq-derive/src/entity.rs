use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Ident, LitStr, Type};

///
/// EntityInput
///
/// Struct-level `#[entity(…)]` attributes.
///

#[derive(FromDeriveInput)]
#[darling(attributes(entity), supports(struct_named))]
struct EntityInput {
    ident: Ident,
    data: Data<Ignored, EntityField>,

    /// Explicit storage table; defaults to the entity name.
    #[darling(default)]
    table: Option<String>,

    /// Explicit entity name; defaults to the type name.
    #[darling(default)]
    name: Option<String>,
}

///
/// EntityField
///
/// Field-level `#[entity(…)]` attributes.
///

#[derive(FromField)]
#[darling(attributes(entity))]
struct EntityField {
    ident: Option<Ident>,
    ty: Type,

    #[darling(default)]
    key: bool,

    /// Storage column. Fields without one are readable in conditions but
    /// never written.
    #[darling(default)]
    column: Option<String>,

    #[darling(default)]
    required: bool,
}

pub fn derive_entity(input: TokenStream) -> TokenStream {
    let parsed = match syn::parse2::<DeriveInput>(input) {
        Ok(parsed) => parsed,
        Err(err) => return err.to_compile_error(),
    };

    let entity = match EntityInput::from_derive_input(&parsed) {
        Ok(entity) => entity,
        Err(err) => return err.write_errors(),
    };

    expand(&entity)
}

fn expand(entity: &EntityInput) -> TokenStream {
    let ident = &entity.ident;
    let entity_name = entity
        .name
        .clone()
        .unwrap_or_else(|| ident.to_string());

    let Data::Struct(fields) = &entity.data else {
        // Guarded by `supports(struct_named)` already.
        return quote!(compile_error!("Entity derives only named structs"));
    };
    let fields: Vec<&EntityField> = fields.iter().collect();

    let Some(key_index) = discover_key(&fields, &entity_name) else {
        let msg = format!(
            "entity '{entity_name}' has no discoverable key field; mark one with #[entity(key)] or name it '{entity_name}Id' / 'id'"
        );
        let msg = LitStr::new(&msg, ident.span());
        return quote!(compile_error!(#msg));
    };

    let table = match &entity.table {
        Some(table) => quote!(Some(#table)),
        None => quote!(None),
    };

    let field_models = fields.iter().enumerate().map(|(index, field)| {
        let name = field_name(field);
        let column = match &field.column {
            Some(column) => quote!(Some(#column)),
            None => quote!(None),
        };
        let required = field.required;
        let is_key = index == key_index;

        quote! {
            ::gridq::model::FieldModel {
                name: #name,
                column: #column,
                required: #required,
                is_key: #is_key,
            }
        }
    });

    let value_arms = fields.iter().map(|field| {
        let name = field_name(field);
        let ident = field_ident(field);

        quote! {
            #name => Some(::gridq::traits::FieldValue::to_value(&self.#ident)),
        }
    });

    let decode_stmts = fields.iter().map(|field| {
        let ident = field_ident(field);
        let column = read_column(field);
        let ty = &field.ty;

        quote! {
            if let Some(decoded) =
                ::gridq::db::column_value::<#ty>(row, #column)?
            {
                value.#ident = decoded;
            }
        }
    });

    let key_field = fields[key_index];
    let key_ident = field_ident(key_field);
    let key_ty = &key_field.ty;

    quote! {
        impl ::gridq::traits::EntitySchema for #ident {
            const MODEL: &'static ::gridq::model::EntityModel = &::gridq::model::EntityModel {
                path: concat!(module_path!(), "::", stringify!(#ident)),
                entity_name: #entity_name,
                table: #table,
                fields: &[#(#field_models),*],
                key: Some(#key_index),
            };
        }

        impl ::gridq::traits::EntityValue for #ident {
            fn field_value(&self, field: &str) -> Option<::gridq::value::Value> {
                match field {
                    #(#value_arms)*
                    _ => None,
                }
            }

            fn key_value(&self) -> ::gridq::value::Value {
                ::gridq::traits::FieldValue::to_value(&self.#key_ident)
            }

            fn set_key_value(&mut self, value: ::gridq::value::Value) {
                if let Some(key) = <#key_ty as ::gridq::traits::FieldValue>::from_value(&value) {
                    self.#key_ident = key;
                }
            }

            fn from_row(
                row: &::gridq::rusqlite::Row<'_>,
            ) -> Result<Self, ::gridq::rusqlite::Error> {
                let mut value = <Self as Default>::default();
                #(#decode_stmts)*
                Ok(value)
            }
        }
    }
}

// Explicit #[entity(key)] wins; else `{Entity}Id`, else `id`, matched
// across naming styles (`ShiftId` == `shift_id`).
fn discover_key(fields: &[&EntityField], entity_name: &str) -> Option<usize> {
    if let Some(index) = fields.iter().position(|field| field.key) {
        return Some(index);
    }

    let stem = format!("{}id", fold_ident(entity_name));
    if let Some(index) = fields
        .iter()
        .position(|field| field.ident.as_ref().is_some_and(|i| fold_ident(&i.to_string()) == stem))
    {
        return Some(index);
    }

    fields.iter().position(|field| {
        field
            .ident
            .as_ref()
            .is_some_and(|i| i.to_string().eq_ignore_ascii_case("id"))
    })
}

fn fold_ident(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// `supports(struct_named)` guarantees the ident exists.
fn field_ident(field: &EntityField) -> &Ident {
    field.ident.as_ref().expect("named struct field")
}

fn field_name(field: &EntityField) -> String {
    field_ident(field).to_string()
}

// Read-path column: the declared column, else the field's own name.
fn read_column(field: &EntityField) -> String {
    field.column.clone().unwrap_or_else(|| field_name(field))
}
