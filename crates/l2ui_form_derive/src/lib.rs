use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, parse_macro_input};

#[proc_macro_derive(FormModel, attributes(form))]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            input.ident,
            "FormModel derive currently supports only non-generic structs",
        )
        .to_compile_error()
        .into();
    }

    let model_ident = input.ident;
    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return syn::Error::new(
                    Span::call_site(),
                    "FormModel derive requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new(
                Span::call_site(),
                "FormModel derive is only supported on structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let l2ui = l2ui_path();
    let mut names = Vec::new();
    let mut to_entries = Vec::new();
    let mut from_entries = Vec::new();

    for field in &named_fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let field_ty = &field.ty;
        let field_name = match field_name(field) {
            Ok(Some(name)) => name,
            Ok(None) => field_ident.to_string(),
            Err(error) => return error.to_compile_error().into(),
        };

        names.push(quote!(#field_name));
        to_entries.push(quote! {
            values.insert(
                #l2ui::SharedString::new_static(#field_name),
                #l2ui::form::IntoFieldValue::to_field_value(&self.#field_ident),
            );
        });
        from_entries.push(quote! {
            #field_ident: <#field_ty as #l2ui::form::FromFieldValue>::from_field_value(
                values.get(#field_name),
            )?,
        });
    }

    quote! {
        impl #l2ui::form::FormModel for #model_ident {
            fn field_names() -> &'static [&'static str] {
                &[#(#names),*]
            }

            fn to_values(&self) -> #l2ui::form::FormValues {
                let mut values = #l2ui::form::FormValues::new();
                #(#to_entries)*
                values
            }

            fn from_values(values: &#l2ui::form::FormValues) -> ::core::option::Option<Self> {
                ::core::option::Option::Some(Self {
                    #(#from_entries)*
                })
            }
        }
    }
    .into()
}

/// Reads `#[form(rename = "...")]`.
fn field_name(field: &Field) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("form")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported form attribute, expected `rename`"))
            }
        })?;
    }
    Ok(rename)
}

fn l2ui_path() -> TokenStream2 {
    match crate_name("l2ui") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::l2ui),
    }
}
