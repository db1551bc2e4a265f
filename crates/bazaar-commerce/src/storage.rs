//! Document store bindings for the domain types.

use bazaar_store::Document;

use crate::cart::Cart;
use crate::catalog::{Category, Product};
use crate::checkout::Order;
use crate::content::{Client, Solution, Testimonial};

macro_rules! impl_document {
    ($ty:ty, $collection:literal, $key:ident) => {
        impl Document for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> String {
                self.$key.to_string()
            }
        }
    };
}

impl_document!(Category, "categories", id);
impl_document!(Product, "products", id);
impl_document!(Cart, "carts", user_id);
impl_document!(Order, "orders", id);
impl_document!(Solution, "solutions", id);
impl_document!(Testimonial, "testimonials", id);
impl_document!(Client, "clients", id);
