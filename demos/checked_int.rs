use checked_alloc::{bump::BumpAllocator, checked_alloc, checked_alloc_in};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    checked_alloc::<i32>(1).dispatch(
        |mut value| {
            value[0] = 5;
            println!("validly allocated {}", value[0]);
        },
        |failure| println!("woops! {}, handling error appropriately", failure),
    );

    // Too small for a single i32.
    let mut arena = [0u8; 2];
    let allocator = BumpAllocator::default_single_threaded(&mut arena);
    checked_alloc_in::<i32, _>(&allocator, 1).dispatch(
        |value| println!("validly allocated {}", value[0]),
        |failure| println!("woops! {}, handling error appropriately", failure),
    );
}
