//! End-to-end persistence: a value graph serialized into a document,
//! stored as JSON, parsed back and deserialized into an equal graph.

use core::any::Any;

use xg_serial::catalog::ContractCatalog;
use xg_serial::context::SerializationContext;
use xg_serial::registry::{PropertyDescriptor, TypeRecord, TypeRegistry};
use xg_serial::value::XList;
use xg_serial::{GraphValue, TypePath, shared};
use xg_tree::XNode;

#[derive(Default)]
struct Circle {
    radius: f64,
    label: String,
}

impl TypePath for Circle {
    fn type_path() -> &'static str {
        "shapes::Circle"
    }
    fn type_name() -> &'static str {
        "Circle"
    }
}

impl GraphValue for Circle {
    fn type_path(&self) -> &'static str {
        "shapes::Circle"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn circle_record() -> TypeRecord {
    TypeRecord::of::<Circle>()
        .with_constructor(|| shared(Circle::default()))
        .with_property(PropertyDescriptor::new::<Circle, f64>(
            "radius",
            |v| v.downcast_ref::<Circle>().map(|c| shared(c.radius)),
            |owner, pv| {
                let Some(radius) = pv.borrow().downcast_ref::<f64>().copied() else {
                    return false;
                };
                let mut owner = owner.borrow_mut();
                let Some(circle) = owner.downcast_mut::<Circle>() else {
                    return false;
                };
                circle.radius = radius;
                true
            },
        ))
        .with_property(PropertyDescriptor::new::<Circle, String>(
            "label",
            |v| v.downcast_ref::<Circle>().map(|c| shared(c.label.clone())),
            |owner, pv| {
                let Some(label) = pv.borrow().downcast_ref::<String>().cloned() else {
                    return false;
                };
                let mut owner = owner.borrow_mut();
                let Some(circle) = owner.downcast_mut::<Circle>() else {
                    return false;
                };
                circle.label = label;
                true
            },
        ))
}

#[test]
fn document_survives_json_storage() {
    let catalog = ContractCatalog::new();
    let mut registry = TypeRegistry::new();
    registry.register(circle_record());

    let graph = shared(XList(vec![
        shared(Circle {
            radius: 1.5,
            label: "inner".to_owned(),
        }),
        shared(Circle {
            radius: 4.0,
            label: "outer".to_owned(),
        }),
    ]));

    let mut ctx = SerializationContext::with(&catalog, &registry);
    let document = ctx.serialize(&graph).unwrap();
    assert!(ctx.errors().is_empty());

    let stored = serde_json::to_string_pretty(&document).unwrap();
    let reloaded: XNode = serde_json::from_str(&stored).unwrap();
    assert_eq!(document, reloaded);

    let restored = ctx.deserialize(&reloaded).unwrap();
    assert!(ctx.errors().is_empty());

    let borrow = restored.borrow();
    let list = borrow.downcast_ref::<XList>().unwrap();
    assert_eq!(list.0.len(), 2);
    let outer = list.0[1].borrow();
    let outer = outer.downcast_ref::<Circle>().unwrap();
    assert_eq!(outer.radius, 4.0);
    assert_eq!(outer.label, "outer");
}
