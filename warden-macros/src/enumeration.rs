//! `#[derive(FilterEnum)]` expansion

use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let type_name = ident.to_string();

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "FilterEnum can only be derived for enums",
            ));
        }
    };

    let mut names = Vec::new();
    let mut idents = Vec::new();
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "FilterEnum variants cannot carry data",
            ));
        }

        let mut rename = None;
        for attr in &variant.attrs {
            if !attr.path().is_ident("filter_enum") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported filter_enum option"))
                }
            })?;
        }

        names.push(rename.unwrap_or_else(|| variant.ident.to_string().to_case(Case::UpperSnake)));
        idents.push(&variant.ident);
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::warden::filters::FilterEnum for #ident #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const VARIANTS: &'static [&'static str] = &[#(#names),*];

            fn as_str(&self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }

            fn from_name(name: &str) -> ::std::option::Option<Self> {
                match name {
                    #(#names => ::std::option::Option::Some(Self::#idents),)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    })
}
