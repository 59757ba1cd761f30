use polycal_core::TransformRegistry;

pub fn run() {
    for name in TransformRegistry::standard().names() {
        println!("{}", name);
    }
}
