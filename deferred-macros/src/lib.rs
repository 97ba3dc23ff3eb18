use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DataStruct, DeriveInput, Field, Fields, parse_macro_input};

/// Generates an `Attribute` and an `AttributeMut` constant for every named
/// field: field `count` becomes `Self::COUNT` and `Self::COUNT_MUT`, with the
/// field's own visibility. Mark a field `#[attributes(skip)]` to leave it out.
#[proc_macro_derive(Attributes, attributes(attributes))]
pub fn derive_attributes(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(named),
            ..
        }) => &named.named,
        _ => {
            return syn::Error::new_spanned(
                &input.ident,
                "`Attributes` can only be derived for structs with named fields",
            )
            .to_compile_error()
            .into();
        }
    };

    let mut constants = Vec::new();
    for field in fields {
        match is_skipped(field) {
            Ok(true) => continue,
            Ok(false) => {}
            Err(err) => return err.to_compile_error().into(),
        }

        // Named fields always carry an ident
        let Some(ident) = &field.ident else { continue };
        let ty = &field.ty;
        let vis = &field.vis;
        let upper = ident.unraw().to_string().to_uppercase();
        let shared = format_ident!("{}", upper, span = ident.span());
        let unique = format_ident!("{}_MUT", upper, span = ident.span());

        constants.push(quote! {
            #vis const #shared: ::deferred::Attribute<Self, #ty> =
                ::deferred::Attribute::new(|this| &this.#ident);
            #vis const #unique: ::deferred::AttributeMut<Self, #ty> =
                ::deferred::AttributeMut::new(|this| &mut this.#ident);
        });
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        #[allow(dead_code)]
        impl #impl_generics #name #ty_generics #where_clause {
            #(#constants)*
        }
    };

    TokenStream::from(expanded)
}

fn is_skipped(field: &Field) -> syn::Result<bool> {
    let mut skip = false;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("attributes")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported `attributes` option, expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}
