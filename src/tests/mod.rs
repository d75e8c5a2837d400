// Tests module
// System call scenarios: success, revert, out-of-gas, misuse, context binding
// Determinism: repeated execution on cloned state is bit-identical
