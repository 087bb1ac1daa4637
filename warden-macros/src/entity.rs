//! `#[derive(FilterableEntity)]` expansion

use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments, Type};

/// Entity-level options from `#[filterable_entity(...)]`
#[derive(Default)]
struct EntityOptions {
    table: Option<String>,
    default_sort: Option<String>,
}

/// Field-level options from `#[filterable(...)]`
#[derive(Default)]
struct FieldOptions {
    category: Option<(String, proc_macro2::Span)>,
    name: Option<String>,
    column: Option<String>,
    flatten: bool,
}

/// One struct field after attribute parsing
enum FieldSpec<'a> {
    Column {
        column: String,
        filter: Option<(String, TokenStream, &'a Type)>,
    },
    Flatten(&'a Type),
}

pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let entity_name = ident.to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    ident,
                    "FilterableEntity requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "FilterableEntity can only be derived for structs",
            ));
        }
    };

    let options = parse_entity_options(&input)?;

    let mut specs = Vec::new();
    for field in fields {
        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let field_options = parse_field_options(field)?;

        if field_options.flatten {
            specs.push(FieldSpec::Flatten(&field.ty));
            continue;
        }

        let raw_name = field_ident.to_string();
        let raw_name = raw_name.trim_start_matches("r#");
        let column = field_options
            .column
            .clone()
            .unwrap_or_else(|| raw_name.to_string());

        let filter = match field_options.category {
            Some((category, span)) => {
                let variant = category_variant(&category, span)?;
                let name = field_options
                    .name
                    .clone()
                    .unwrap_or_else(|| raw_name.to_case(Case::Camel));
                Some((name, variant, strip_option(&field.ty)))
            }
            None => None,
        };

        specs.push(FieldSpec::Column { column, filter });
    }

    let field_pushes = specs.iter().map(|spec| match spec {
        FieldSpec::Column {
            column,
            filter: Some((name, category, ty)),
        } => quote! {
            fields.push(::warden::filters::FilterField::new(
                #name,
                #column,
                ::warden::filters::FilterCategory::#category,
                ::warden::filters::ValueType::of::<#ty>(),
            ));
        },
        FieldSpec::Column { filter: None, .. } => quote! {},
        FieldSpec::Flatten(ty) => quote! {
            fields.extend(<#ty as ::warden::filters::FilterableEntity>::declared_fields());
        },
    });

    let column_pushes = specs.iter().map(|spec| match spec {
        FieldSpec::Column { column, .. } => quote! {
            columns.push(#column);
        },
        FieldSpec::Flatten(ty) => quote! {
            columns.extend(<#ty as ::warden::filters::FilterableEntity>::declared_columns());
        },
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let database_entity = match &options.table {
        Some(table) => {
            let default_sort = options.default_sort.clone().or_else(|| {
                specs.iter().find_map(|spec| match spec {
                    FieldSpec::Column { column, .. } => Some(column.clone()),
                    FieldSpec::Flatten(_) => None,
                })
            });
            let default_sort = default_sort.ok_or_else(|| {
                syn::Error::new_spanned(ident, "an entity with a table needs at least one column")
            })?;
            quote! {
                impl #impl_generics ::warden::orm::DatabaseEntity for #ident #ty_generics #where_clause {
                    const TABLE_NAME: &'static str = #table;
                    const DEFAULT_SORT: &'static str = #default_sort;

                    fn column_names() -> ::std::vec::Vec<&'static str> {
                        <Self as ::warden::filters::FilterableEntity>::declared_columns()
                    }
                }
            }
        }
        None => quote! {},
    };

    Ok(quote! {
        impl #impl_generics ::warden::filters::FilterableEntity for #ident #ty_generics #where_clause {
            const ENTITY_NAME: &'static str = #entity_name;

            fn declared_fields() -> ::std::vec::Vec<::warden::filters::FilterField> {
                let mut fields = ::std::vec::Vec::new();
                #(#field_pushes)*
                fields
            }

            fn declared_columns() -> ::std::vec::Vec<&'static str> {
                let mut columns: ::std::vec::Vec<&'static str> = ::std::vec::Vec::new();
                #(#column_pushes)*
                columns
            }
        }

        #database_entity
    })
}

fn parse_entity_options(input: &DeriveInput) -> syn::Result<EntityOptions> {
    let mut options = EntityOptions::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("filterable_entity") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                options.table = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("default_sort") {
                let value: LitStr = meta.value()?.parse()?;
                options.default_sort = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported filterable_entity option"))
            }
        })?;
    }
    Ok(options)
}

fn parse_field_options(field: &syn::Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("filterable") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("type") {
                let value: LitStr = meta.value()?.parse()?;
                options.category = Some((value.value(), value.span()));
                Ok(())
            } else if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                options.name = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("column") {
                let value: LitStr = meta.value()?.parse()?;
                options.column = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("flatten") {
                options.flatten = true;
                Ok(())
            } else {
                Err(meta.error("unsupported filterable option"))
            }
        })?;
    }

    if options.flatten && (options.category.is_some() || options.column.is_some()) {
        return Err(syn::Error::new_spanned(
            field,
            "`flatten` cannot be combined with `type` or `column`",
        ));
    }

    Ok(options)
}

fn category_variant(category: &str, span: proc_macro2::Span) -> syn::Result<TokenStream> {
    let variant = match category {
        "text" => quote! { Text },
        "number" => quote! { Number },
        "boolean" => quote! { Boolean },
        "date" => quote! { Date },
        "token" => quote! { Token },
        "enum" => quote! { Enum },
        "identifier" | "uuid" => quote! { Identifier },
        other => {
            return Err(syn::Error::new(
                span,
                format!(
                    "unknown filter type `{}` (expected text, number, boolean, date, token, enum or identifier)",
                    other
                ),
            ));
        }
    };
    Ok(variant)
}

/// `Option<T>` -> `T`, anything else unchanged
fn strip_option(ty: &Type) -> &Type {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return inner;
                    }
                }
            }
        }
    }
    ty
}
