use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DataStruct, DeriveInput, Fields};

/// 生成 Model trait 的实现
///
/// 从结构体定义生成 `MODEL_NAME` 常量、字段描述符列表和按名读写
/// 字段值的方法。表名不在这里声明，由映射层从 `MODEL_NAME` 推导。
///
/// 字段类型从 Rust 类型推断，`Option<T>` 表示可空列；
/// 名为 `id` 的字段自动标记为自增主键；`#[dao(skip)]` 的字段
/// 不参与映射。
///
/// 使用示例：
/// ```ignore
/// #[derive(Model)]
/// struct Product {
///     id: Option<i64>,
///     name: Option<String>,
///     price: Option<f64>,
///     #[dao(skip)]
///     dirty: bool,
/// }
/// ```
#[proc_macro_derive(Model, attributes(dao))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let model_name = name.to_string();

    // 获取字段列表（必须是具名字段的结构体）
    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return syn::Error::new_spanned(
                name,
                "Model derive only supports structs with named fields",
            )
            .to_compile_error()
            .into();
        }
    };

    let mut meta_entries = Vec::new();
    let mut value_arms = Vec::new();
    let mut set_arms = Vec::new();

    for field in fields {
        let field_ident = field.ident.as_ref().unwrap();
        let field_name = field_ident.to_string();

        // #[dao(skip)] 的字段不参与映射
        if has_skip_attr(field) {
            continue;
        }

        let is_opt = is_option_type(&field.ty);
        let value_ty = if is_opt {
            match option_inner_type(&field.ty) {
                Some(inner) => inner,
                None => &field.ty,
            }
        } else {
            &field.ty
        };

        let kind = match field_kind(value_ty) {
            Some(kind) => kind,
            None => {
                return syn::Error::new_spanned(
                    &field.ty,
                    "Model derive does not support this field type, use #[dao(skip)] to exclude it",
                )
                .to_compile_error()
                .into();
            }
        };
        let kind_ident = syn::Ident::new(kind, proc_macro2::Span::call_site());
        let name_lit = syn::LitStr::new(&field_name, proc_macro2::Span::call_site());
        let is_pk = field_name == "id";

        meta_entries.push(quote! {
            sqldao::FieldMeta {
                name: #name_lit,
                kind: sqldao::FieldKind::#kind_ident,
                primary_key: #is_pk,
                auto_increment: #is_pk,
            }
        });

        // 按名读取字段值，Option 为 None 时返回 None
        if is_opt {
            value_arms.push(quote! {
                #name_lit => self.#field_ident.clone().map(sqldao::SqlValue::from),
            });
        } else {
            value_arms.push(quote! {
                #name_lit => Some(sqldao::SqlValue::from(self.#field_ident.clone())),
            });
        }

        // 按名写回字段值，类型不匹配的值被忽略
        let read_expr = read_expr_for_kind(kind);
        if is_opt {
            set_arms.push(quote! {
                #name_lit => {
                    if value.is_null() {
                        self.#field_ident = None;
                    } else if let Some(v) = #read_expr {
                        self.#field_ident = Some(v);
                    }
                }
            });
        } else {
            set_arms.push(quote! {
                #name_lit => {
                    if let Some(v) = #read_expr {
                        self.#field_ident = v;
                    }
                }
            });
        }
    }

    let expanded = quote! {
        impl sqldao::Model for #name {
            const MODEL_NAME: &'static str = #model_name;

            fn fields() -> &'static [sqldao::FieldMeta] {
                static FIELDS: &[sqldao::FieldMeta] = &[ #( #meta_entries, )* ];
                FIELDS
            }

            fn field_value(&self, name: &str) -> Option<sqldao::SqlValue> {
                match name {
                    #( #value_arms )*
                    _ => None,
                }
            }

            fn set_field(&mut self, name: &str, value: sqldao::SqlValue) {
                match name {
                    #( #set_arms )*
                    _ => {}
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// 检查字段是否带 #[dao(skip)]
fn has_skip_attr(field: &syn::Field) -> bool {
    for attr in &field.attrs {
        if attr.path().is_ident("dao") {
            if let syn::Meta::List(list) = &attr.meta {
                let mut skip = false;
                let _ = list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("skip") {
                        skip = true;
                    }
                    Ok(())
                });
                if skip {
                    return true;
                }
            }
        }
    }
    false
}

fn is_option_type(ty: &syn::Type) -> bool {
    if let syn::Type::Path(type_path) = ty {
        if let Some(seg) = type_path.path.segments.last() {
            if seg.ident == "Option" {
                if let syn::PathArguments::AngleBracketed(args) = &seg.arguments {
                    return args.args.len() == 1;
                }
            }
        }
    }
    false
}

fn option_inner_type(ty: &syn::Type) -> Option<&syn::Type> {
    if let syn::Type::Path(type_path) = ty {
        if let Some(seg) = type_path.path.segments.last() {
            if seg.ident == "Option" {
                if let syn::PathArguments::AngleBracketed(args) = &seg.arguments {
                    if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                        return Some(inner);
                    }
                }
            }
        }
    }
    None
}

/// 由字段的 Rust 类型推断语义类型，返回 FieldKind 变体名
fn field_kind(ty: &syn::Type) -> Option<&'static str> {
    if let syn::Type::Path(type_path) = ty {
        if let Some(seg) = type_path.path.segments.last() {
            return match seg.ident.to_string().as_str() {
                "i64" => Some("BigInt"),
                "i32" => Some("Int"),
                "i16" => Some("SmallInt"),
                "f64" => Some("Double"),
                "f32" => Some("Float"),
                "bool" => Some("Bool"),
                "String" => Some("Text"),
                "NaiveDateTime" => Some("Timestamp"),
                _ => None,
            };
        }
    }
    None
}

/// 各语义类型对应的 SqlValue 读取表达式
fn read_expr_for_kind(kind: &str) -> proc_macro2::TokenStream {
    match kind {
        "BigInt" => quote! { value.as_i64() },
        "Int" => quote! { value.as_i64().map(|v| v as i32) },
        "SmallInt" => quote! { value.as_i64().map(|v| v as i16) },
        "Double" => quote! { value.as_f64() },
        "Float" => quote! { value.as_f64().map(|v| v as f32) },
        "Bool" => quote! { value.as_bool() },
        "Text" => quote! { value.as_text().map(|s| s.to_string()) },
        "Timestamp" => quote! { value.as_timestamp() },
        _ => unreachable!(),
    }
}
