use std::fmt::Display;

/// An ordered argument list that can be rendered for the start line.
pub trait Arguments {
    fn render(&self) -> Vec<String>;
}

/// Renders arguments as `[a, b, c]`.
pub fn render_params<A: Arguments + ?Sized>(args: &A) -> String {
    format!("[{}]", args.render().join(", "))
}

impl Arguments for () {
    fn render(&self) -> Vec<String> {
        Vec::new()
    }
}

impl<T: Display> Arguments for [T] {
    fn render(&self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

impl<T: Display> Arguments for Vec<T> {
    fn render(&self) -> Vec<String> {
        self.as_slice().render()
    }
}

impl<A: Arguments + ?Sized> Arguments for &A {
    fn render(&self) -> Vec<String> {
        (**self).render()
    }
}

macro_rules! impl_arguments_for_tuple {
    ($($ty:ident => $idx:tt),+) => {
        impl<$($ty: Display),+> Arguments for ($($ty,)+) {
            fn render(&self) -> Vec<String> {
                vec![$(self.$idx.to_string()),+]
            }
        }
    };
}

impl_arguments_for_tuple!(T1 => 0);
impl_arguments_for_tuple!(T1 => 0, T2 => 1);
impl_arguments_for_tuple!(T1 => 0, T2 => 1, T3 => 2);
impl_arguments_for_tuple!(T1 => 0, T2 => 1, T3 => 2, T4 => 3);
impl_arguments_for_tuple!(T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4);
impl_arguments_for_tuple!(T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4, T6 => 5);
impl_arguments_for_tuple!(T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4, T6 => 5, T7 => 6);
impl_arguments_for_tuple!(T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4, T6 => 5, T7 => 6, T8 => 7);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_mixed_tuple_in_order() {
        assert_eq!(render_params(&(42, "x")), "[42, x]");
        assert_eq!(render_params(&(1, "a", 2.5, 'c')), "[1, a, 2.5, c]");
    }

    #[test]
    fn renders_empty_argument_list() {
        assert_eq!(render_params(&()), "[]");
        assert_eq!(render_params(&Vec::<String>::new()), "[]");
    }

    #[test]
    fn renders_collections_and_references() {
        let values = vec!["7".to_string(), "name=bolt".to_string()];
        assert_eq!(render_params(&values), "[7, name=bolt]");
        assert_eq!(render_params(&&values), "[7, name=bolt]");
        assert_eq!(render_params(&[3u8, 4u8][..]), "[3, 4]");
    }

    #[test]
    fn single_element_tuple_has_no_separator() {
        assert_eq!(render_params(&(String::from("only"),)), "[only]");
    }
}
