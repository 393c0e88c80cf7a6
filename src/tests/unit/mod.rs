mod elevenlabs_provider_tests;
mod openai_provider_tests;
